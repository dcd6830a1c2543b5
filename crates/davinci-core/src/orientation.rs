//! Orientation normalisation: turn a tagged pixel buffer upright.
//!
//! Each [`Orientation`] maps to an affine transform from the stored buffer's
//! pixel space into the upright image's pixel space. The transform is composed
//! from a rotation about the buffer (translate + rotate) and, for mirrored
//! tags, a horizontal mirror applied first in the stored space
//! (translate + scale(-1, 1)). The upright buffer is rendered by sampling the
//! stored buffer through the inverse transform at every output pixel center.

use std::borrow::Cow;

use image::RgbaImage;
use tiny_skia::Transform;
use tracing::debug;

use crate::error::RenderError;
use crate::raster::{Orientation, RasterImage};

/// Clockwise rotation component of an orientation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterTurn {
    None,
    Cw90,
    Cw180,
    Cw270,
}

fn decompose(orientation: Orientation) -> (QuarterTurn, bool) {
    match orientation {
        Orientation::Normal => (QuarterTurn::None, false),
        Orientation::FlipHorizontal => (QuarterTurn::None, true),
        Orientation::Rotate180 => (QuarterTurn::Cw180, false),
        Orientation::FlipVertical => (QuarterTurn::Cw180, true),
        Orientation::Transpose => (QuarterTurn::Cw270, true),
        Orientation::Rotate90CW => (QuarterTurn::Cw90, false),
        Orientation::Transverse => (QuarterTurn::Cw90, true),
        Orientation::Rotate270CW => (QuarterTurn::Cw270, false),
    }
}

/// Affine transform mapping stored pixel coordinates to upright pixel
/// coordinates.
///
/// # Arguments
///
/// * `orientation` - Tag of the stored buffer
/// * `width` - Stored buffer width in pixels
/// * `height` - Stored buffer height in pixels
///
/// # Returns
///
/// A transform whose image of the rect `(0, 0, width, height)` is exactly the
/// upright rect (`(0, 0, height, width)` when the tag swaps dimensions).
pub fn orientation_transform(orientation: Orientation, width: f32, height: f32) -> Transform {
    let (turn, mirrored) = decompose(orientation);

    let rotation = match turn {
        QuarterTurn::None => Transform::identity(),
        // (x, y) -> (h - y, x)
        QuarterTurn::Cw90 => Transform::from_row(0.0, 1.0, -1.0, 0.0, height, 0.0),
        // (x, y) -> (w - x, h - y)
        QuarterTurn::Cw180 => Transform::from_row(-1.0, 0.0, 0.0, -1.0, width, height),
        // (x, y) -> (y, w - x)
        QuarterTurn::Cw270 => Transform::from_row(0.0, -1.0, 1.0, 0.0, 0.0, width),
    };

    if mirrored {
        // (x, y) -> (w - x, y), applied before the rotation
        rotation.pre_concat(Transform::from_row(-1.0, 0.0, 0.0, 1.0, width, 0.0))
    } else {
        rotation
    }
}

/// Upright pixel buffer of `image`.
///
/// Returns the stored buffer borrowed when the image is already upright,
/// otherwise a newly rendered buffer with swapped dimensions for the
/// quarter-turn tags.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the image holds no pixels.
pub fn normalize(image: &RasterImage) -> Result<Cow<'_, RgbaImage>, RenderError> {
    if image.is_empty() {
        return Err(RenderError::EmptyImage);
    }

    let orientation = image.orientation();
    if orientation.is_upright() {
        return Ok(Cow::Borrowed(image.pixels()));
    }

    let src = image.pixels();
    let (width, height) = src.dimensions();
    let (out_w, out_h) = image.upright_dimensions();
    debug!(?orientation, width, height, out_w, out_h, "Normalizing image orientation");

    let inverse = orientation_transform(orientation, width as f32, height as f32)
        .invert()
        .ok_or(RenderError::EmptyImage)?;

    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;
    let out = RgbaImage::from_fn(out_w, out_h, |x, y| {
        let cx = x as f32 + 0.5;
        let cy = y as f32 + 0.5;
        let sx = inverse.sx * cx + inverse.kx * cy + inverse.tx;
        let sy = inverse.ky * cx + inverse.sy * cy + inverse.ty;
        let px = (sx.floor() as i64).clamp(0, max_x) as u32;
        let py = (sy.floor() as i64).clamp(0, max_y) as u32;
        *src.get_pixel(px, py)
    });

    Ok(Cow::Owned(out))
}

/// A copy of `image` turned upright, keeping its scale.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the image holds no pixels.
pub fn upright(image: &RasterImage) -> Result<RasterImage, RenderError> {
    let pixels = normalize(image)?.into_owned();
    Ok(RasterImage::from_parts(pixels, image.scale(), Orientation::Normal))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
