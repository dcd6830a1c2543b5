//! Fit-mode resizing.
//!
//! The source is turned upright, scaled uniformly by a ratio chosen from the
//! target size and the fit mode, then (for `Crop` and `Scale`) drawn once more
//! into a canvas of exactly the target size.
//!
//! Ratios are computed against the upright pixel dimensions of the source. The
//! intermediate bounds are `round(pixels * ratio)` per axis (`f32::round`,
//! half away from zero) and are logical units at the source's scale.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{render_with, RenderOptions};
use crate::error::RenderError;
use crate::geometry::{OriginConvention, Rect, Size};
use crate::orientation::normalize;
use crate::raster::RasterImage;

/// How a source's aspect ratio is reconciled with a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FitMode {
    /// Fit within the target without cropping or distorting. One output
    /// dimension matches the target; the other keeps the source aspect ratio.
    #[default]
    Clip,
    /// Fill the target and crop the excess around the center. The output is
    /// exactly the target size.
    Crop,
    /// Stretch to exactly the target size.
    Scale,
}

impl FitMode {
    /// Uniform scale ratio for the given per-axis ratios.
    pub fn scale_ratio(self, width_ratio: f32, height_ratio: f32) -> f32 {
        match self {
            FitMode::Clip => width_ratio.min(height_ratio),
            FitMode::Crop | FitMode::Scale => width_ratio.max(height_ratio),
        }
    }
}

/// Resize `image` to `target` under `mode`.
///
/// # Arguments
///
/// * `image` - Source image, any orientation
/// * `target` - Target logical size
/// * `mode` - Fit policy
/// * `options` - Resampling settings
///
/// # Returns
///
/// A new upright image at the source's scale.
///
/// # Errors
///
/// Returns `RenderError::InvalidSize` if any target or intermediate dimension
/// is not positive, `RenderError::EmptyImage` if the source holds no pixels,
/// and `RenderError::CanvasAllocation` if an intermediate canvas exceeds
/// [`MAX_CANVAS_PIXELS`](crate::context::MAX_CANVAS_PIXELS) or cannot be
/// allocated.
pub fn resize(
    image: &RasterImage,
    target: Size,
    mode: FitMode,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    if target.is_empty() {
        return Err(RenderError::InvalidSize {
            width: target.width,
            height: target.height,
        });
    }

    let pixels = normalize(image)?;
    let (src_w, src_h) = (pixels.width() as f32, pixels.height() as f32);

    let width_ratio = target.width / src_w;
    let height_ratio = target.height / src_h;
    let ratio = mode.scale_ratio(width_ratio, height_ratio);
    let bounds = Size::new((src_w * ratio).round(), (src_h * ratio).round());
    debug!(?mode, width_ratio, height_ratio, ratio, ?bounds, "Resizing image");

    let scale = image.scale();
    let origin = OriginConvention::NATIVE;
    let scaled = render_with(bounds, scale, origin, *options, |size, ctx| {
        ctx.draw_pixels(&pixels, Rect::from_size(size))
    })?;

    match mode {
        FitMode::Clip => Ok(scaled),
        FitMode::Crop => {
            let dx = (bounds.width - target.width) / 2.0;
            let dy = (bounds.height - target.height) / 2.0;
            render_with(target, scale, origin, *options, |_, ctx| {
                ctx.draw_pixels(scaled.pixels(), Rect::new(-dx, -dy, bounds.width, bounds.height))
            })
        }
        FitMode::Scale => render_with(target, scale, origin, *options, |size, ctx| {
            ctx.draw_pixels(scaled.pixels(), Rect::from_size(size))
        }),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use image::RgbaImage;
    use proptest::prelude::*;

    fn source(w: u32, h: u32) -> RasterImage {
        RasterImage::new(RgbaImage::from_pixel(w, h, image::Rgba([40, 80, 120, 255])))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: Scale output is exactly the target size.
        #[test]
        fn prop_scale_matches_target(
            sw in 1u32..80, sh in 1u32..80,
            tw in 1u32..80, th in 1u32..80,
        ) {
            let out = resize(&source(sw, sh), Size::new(tw as f32, th as f32), FitMode::Scale, &RenderOptions::default()).unwrap();
            prop_assert_eq!(out.pixels().dimensions(), (tw, th));
        }

        /// Property: Crop output is exactly the target size.
        #[test]
        fn prop_crop_matches_target(
            sw in 1u32..80, sh in 1u32..80,
            tw in 1u32..80, th in 1u32..80,
        ) {
            let out = resize(&source(sw, sh), Size::new(tw as f32, th as f32), FitMode::Crop, &RenderOptions::default()).unwrap();
            prop_assert_eq!(out.pixels().dimensions(), (tw, th));
        }

        /// Property: Clip matches the constraining side and keeps the aspect ratio.
        #[test]
        fn prop_clip_keeps_aspect(
            sw in 8u32..80, sh in 8u32..80,
            tw in 8u32..80, th in 8u32..80,
        ) {
            let result = resize(&source(sw, sh), Size::new(tw as f32, th as f32), FitMode::Clip, &RenderOptions::default());
            let Ok(out) = result else {
                // Extreme aspect ratios can round a side to zero
                return Ok(());
            };
            let (ow, oh) = out.pixels().dimensions();
            prop_assert!(ow <= tw && oh <= th);
            prop_assert!(ow == tw || oh == th);

            // Aspect ratio within one pixel of rounding
            let expected_h = ow as f32 * sh as f32 / sw as f32;
            let expected_w = oh as f32 * sw as f32 / sh as f32;
            prop_assert!((oh as f32 - expected_h).abs() <= 1.0 || (ow as f32 - expected_w).abs() <= 1.0);
        }
    }
}
