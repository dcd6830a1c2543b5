//! Layer compositing: draw one image over another.

use crate::context::{render_with, RenderOptions};
use crate::error::RenderError;
use crate::geometry::{OriginConvention, Rect};
use crate::orientation::normalize;
use crate::raster::RasterImage;

/// Draw `top` over `base` inside `frame`.
///
/// The result has the base's logical size and scale. `frame` is in the base's
/// logical coordinates and is not clamped: it may extend past the edges or lie
/// fully outside. An empty `top` leaves the base unchanged.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if `base` holds no pixels.
pub fn overlay(
    base: &RasterImage,
    top: &RasterImage,
    frame: Rect,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let pixels = normalize(base)?;

    render_with(base.size(), base.scale(), OriginConvention::NATIVE, *options, |size, ctx| {
        ctx.draw_pixels(&pixels, Rect::from_size(size))?;
        if !top.is_empty() {
            ctx.draw_image(top, frame)?;
        }
        Ok(())
    })
}
