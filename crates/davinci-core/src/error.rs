//! Error type shared by every image operation.
//!
//! An `Err` means "no image was produced": the operation is terminal for that
//! call and never returns a partially drawn buffer.

use thiserror::Error;

/// Reasons an image operation produced no result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// A canvas or target size has a zero (or negative, or non-finite) dimension.
    #[error("Invalid size requested: {width} x {height} - must not be 0 in any dimension")]
    InvalidSize { width: f32, height: f32 },

    /// The source image has no decodable pixel data.
    #[error("Image has no decodable pixel data")]
    EmptyImage,

    /// The mask image has no decodable pixel data.
    #[error("Mask image has no decodable pixel data")]
    MaskUnavailable,

    /// The off-screen raster surface could not be allocated.
    #[error("Failed to allocate a {width}x{height} raster canvas")]
    CanvasAllocation { width: u32, height: u32 },

    /// Encoded bytes could not be decoded into an image.
    #[error("Decoding failed: {0}")]
    Decode(String),

    /// An image could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),
}
