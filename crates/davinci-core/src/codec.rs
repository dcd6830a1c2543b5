//! Decoding encoded bytes into [`RasterImage`]s and encoding them as PNG.
//!
//! Decoding keeps the stored pixel layout and records the EXIF orientation tag
//! on the image instead of applying it; operations turn images upright when
//! they need to.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use tracing::debug;

use crate::error::RenderError;
use crate::orientation::normalize;
use crate::raster::{Orientation, RasterImage};

/// Decode PNG or JPEG bytes.
///
/// # Arguments
///
/// * `bytes` - Encoded image file bytes
///
/// # Returns
///
/// An image at scale 1 carrying the EXIF orientation tag (or
/// `Orientation::Normal` when there is none).
///
/// # Errors
///
/// Returns `RenderError::Decode` if the bytes are not a supported image and
/// `RenderError::EmptyImage` if the decoded image has no pixels.
pub fn decode(bytes: &[u8]) -> Result<RasterImage, RenderError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| RenderError::Decode(e.to_string()))?;

    let pixels = img.into_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(RenderError::EmptyImage);
    }

    debug!(width = pixels.width(), height = pixels.height(), ?orientation, "Decoded image");
    Ok(RasterImage::new(pixels).with_orientation(orientation))
}

/// Extract EXIF orientation from encoded bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Encode the upright pixels of `image` as PNG.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the image has no pixels and
/// `RenderError::Encode` if the encoder fails.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, RenderError> {
    let pixels = normalize(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Encode(e.to_string()))?;

    Ok(buffer.into_inner())
}
