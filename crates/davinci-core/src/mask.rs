//! Masking: draw an image through a clip region and optionally stroke a border.
//!
//! Every mode turns the source upright, opens a canvas at the source's logical
//! size and scale, clips, draws the source into the full rect and returns the
//! canvas contents. Pixels outside the clip stay transparent.

use std::borrow::Cow;

use image::{imageops, Rgba};
use tiny_skia::Mask;

use crate::context::{render_with, RenderOptions};
use crate::error::RenderError;
use crate::geometry::{OriginConvention, Rect};
use crate::orientation::normalize;
use crate::path::Path;
use crate::raster::RasterImage;
use crate::{Border, Corner};

/// Rec. 709 luma weights in 1/256 steps; they sum to 256.
const LUMA_WEIGHTS: [u32; 3] = [54, 183, 19];

/// Clip coverage of one mask pixel: dark keeps the source, light removes it.
///
/// The pixel is flattened onto white first, so transparent mask areas act
/// like white ones.
fn mask_coverage(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, a] = pixel.0.map(u32::from);
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let luma = (wr * r + wg * g + wb * b + 128) >> 8;
    let on_white = (luma * a + 255 * (255 - a) + 127) / 255;
    (255 - on_white) as u8
}

/// Mask `image` with the luminance of `mask`.
///
/// Black mask areas let the source through, white areas suppress it, gray
/// areas blend with alpha `1 - luminance`. The mask is stretched over the
/// whole image.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the source holds no pixels and
/// `RenderError::MaskUnavailable` if the mask holds no pixels.
pub fn mask_with_image(
    image: &RasterImage,
    mask: &RasterImage,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let pixels = normalize(image)?;
    let mask_pixels = normalize(mask).map_err(|_| RenderError::MaskUnavailable)?;

    render_with(image.size(), image.scale(), OriginConvention::NATIVE, *options, |size, ctx| {
        let (width, height) = (ctx.pixel_width(), ctx.pixel_height());
        let resampled = if mask_pixels.dimensions() == (width, height) {
            Cow::Borrowed(mask_pixels.as_ref())
        } else {
            Cow::Owned(imageops::resize(
                mask_pixels.as_ref(),
                width,
                height,
                options.filter.to_image_filter(),
            ))
        };

        let mut coverage =
            Mask::new(width, height).ok_or(RenderError::CanvasAllocation { width, height })?;
        for (dst, p) in coverage.data_mut().iter_mut().zip(resampled.pixels()) {
            *dst = mask_coverage(*p);
        }

        ctx.clip_to_mask(&coverage)?;
        ctx.draw_pixels(&pixels, Rect::from_size(size))
    })
}

/// Mask `image` with the ellipse inscribed in its bounds.
///
/// A visible `border` is stroked along a concentric ellipse, inset according
/// to its alignment (half the width for `Inside`).
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the source holds no pixels.
pub fn mask_with_ellipse(
    image: &RasterImage,
    border: &Border,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let pixels = normalize(image)?;

    render_with(image.size(), image.scale(), OriginConvention::NATIVE, *options, |size, ctx| {
        let rect = Rect::from_size(size);
        ctx.add_ellipse(rect);
        ctx.clip();
        ctx.draw_pixels(&pixels, rect)?;

        if border.is_visible() {
            let inset = border.inset();
            ctx.set_stroke_color(border.color);
            ctx.set_line_width(border.width);
            ctx.add_ellipse(rect.inset(inset, inset));
            ctx.stroke_path();
        }
        Ok(())
    })
}

/// Scale `path` uniformly to fit `target` and center it.
///
/// The path fits the target's width when its own aspect ratio is wider than
/// the target's, otherwise its height. A path with no extent is returned
/// unchanged.
pub fn fit_path(path: &Path, target: Rect) -> Path {
    let Some(bounds) = path.bounds() else {
        return path.clone();
    };

    let path_aspect = bounds.width() / bounds.height();
    let target_aspect = target.width() / target.height();
    let factor = if path_aspect > target_aspect {
        target.width() / bounds.width()
    } else {
        target.height() / bounds.height()
    };
    if !(factor.is_finite() && factor > 0.0) {
        return path.clone();
    }

    let dx = target.min_x() + (target.width() - bounds.width() * factor) / 2.0;
    let dy = target.min_y() + (target.height() - bounds.height() * factor) / 2.0;
    path.translated(-bounds.min_x(), -bounds.min_y())
        .scaled(factor, factor)
        .translated(dx, dy)
}

/// Mask `image` with a caller-built path.
///
/// `build` receives the image's logical rect and returns the path, which is
/// then fitted to the rect with [`fit_path`]. A path that draws nothing clips
/// everything away.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the source holds no pixels.
pub fn mask_with_path<F>(
    image: &RasterImage,
    build: F,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError>
where
    F: FnOnce(Rect) -> Path,
{
    let pixels = normalize(image)?;
    let rect = Rect::from_size(image.size());
    let path = fit_path(&build(rect), rect);

    render_with(image.size(), image.scale(), OriginConvention::NATIVE, *options, |size, ctx| {
        ctx.add_path(&path);
        ctx.clip();
        ctx.draw_pixels(&pixels, Rect::from_size(size))
    })
}

/// Mask `image` with a rounded rectangle of uniform `radius`.
///
/// See [`mask_with_corners`].
pub fn mask_with_rounded_rect(
    image: &RasterImage,
    radius: f32,
    border: &Border,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    mask_with_corners(image, &Corner::uniform(radius), border, options)
}

/// Mask `image` with a rounded rectangle with per-corner radii.
///
/// Radii are clamped to half the shorter side. A visible `border` is stroked
/// at twice its width along the same rounded rect while the clip is active,
/// so `width` of it shows inside the edge.
///
/// # Errors
///
/// Returns `RenderError::EmptyImage` if the source holds no pixels.
pub fn mask_with_corners(
    image: &RasterImage,
    corners: &Corner,
    border: &Border,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let pixels = normalize(image)?;

    render_with(image.size(), image.scale(), OriginConvention::NATIVE, *options, |size, ctx| {
        let rect = Rect::from_size(size);
        ctx.add_rounded_rect(rect, corners);
        ctx.clip();
        ctx.draw_pixels(&pixels, rect)?;

        if border.is_visible() {
            ctx.set_stroke_color(border.color);
            ctx.set_line_width(border.width * 2.0);
            ctx.add_rounded_rect(rect, corners);
            ctx.stroke_path();
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};
    use crate::raster::Orientation;
    use crate::{BorderAlignment, Color};
    use image::{Rgba, RgbaImage};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        RasterImage::new(RgbaImage::from_pixel(width, height, RED))
    }

    fn px(image: &RasterImage, x: u32, y: u32) -> [u8; 4] {
        image.pixels().get_pixel(x, y).0
    }

    fn opts() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn test_ellipse_clears_corners_keeps_center() {
        let out = mask_with_ellipse(&create_test_image(50, 50), &Border::none(), &opts()).unwrap();
        assert_eq!(out.pixels().dimensions(), (50, 50));
        assert_eq!(px(&out, 0, 0)[3], 0);
        assert_eq!(px(&out, 49, 49)[3], 0);
        assert_eq!(px(&out, 25, 25), [255, 0, 0, 255]);
    }

    #[test]
    fn test_ellipse_zero_width_border_equals_no_border() {
        let img = create_test_image(40, 30);
        let plain = mask_with_ellipse(&img, &Border::none(), &opts()).unwrap();
        let zero = mask_with_ellipse(&img, &Border::new(0.0, Color::BLUE), &opts()).unwrap();
        assert_eq!(plain, zero);
    }

    #[test]
    fn test_ellipse_inside_border_is_visible_at_edge() {
        let border = Border::new(4.0, Color::BLUE);
        let out = mask_with_ellipse(&create_test_image(60, 60), &border, &opts()).unwrap();
        // Left edge at mid-height: inside the ellipse, within the stroke
        assert_eq!(px(&out, 2, 30), [0, 0, 255, 255]);
        assert_eq!(px(&out, 30, 30), [255, 0, 0, 255]);
    }

    #[test]
    fn test_ellipse_outside_border_is_clipped_away() {
        let border = Border::new(4.0, Color::BLUE).with_alignment(BorderAlignment::Outside);
        let out = mask_with_ellipse(&create_test_image(60, 60), &border, &opts()).unwrap();
        // The stroke lies outside the clip ellipse
        assert_eq!(px(&out, 3, 30), [255, 0, 0, 255]);
    }

    #[test]
    fn test_ellipse_uses_upright_logical_size() {
        let img = RasterImage::from_parts(RgbaImage::from_pixel(40, 20, RED), 2.0, Orientation::Rotate90CW);
        let out = mask_with_ellipse(&img, &Border::none(), &opts()).unwrap();
        assert_eq!(out.pixels().dimensions(), (20, 40));
        assert_eq!(out.size(), Size::new(10.0, 20.0));
        assert_eq!(out.scale(), 2.0);
    }

    #[test]
    fn test_empty_source_fails_every_mode() {
        let empty = RasterImage::new(RgbaImage::new(0, 0));
        assert_eq!(mask_with_ellipse(&empty, &Border::none(), &opts()).unwrap_err(), RenderError::EmptyImage);
        assert_eq!(
            mask_with_rounded_rect(&empty, 4.0, &Border::none(), &opts()).unwrap_err(),
            RenderError::EmptyImage
        );
        assert_eq!(
            mask_with_path(&empty, Path::rectangle, &opts()).unwrap_err(),
            RenderError::EmptyImage
        );
        assert_eq!(
            mask_with_image(&empty, &create_test_image(2, 2), &opts()).unwrap_err(),
            RenderError::EmptyImage
        );
    }

    #[test]
    fn test_mask_coverage_extremes() {
        assert_eq!(mask_coverage(Rgba([0, 0, 0, 255])), 255);
        assert_eq!(mask_coverage(Rgba([255, 255, 255, 255])), 0);
        assert_eq!(mask_coverage(Rgba([0, 0, 0, 0])), 0);
        assert_eq!(LUMA_WEIGHTS.iter().sum::<u32>(), 256);
    }

    #[test]
    fn test_mask_coverage_gray_is_inverse() {
        for v in [0u8, 64, 128, 192, 255] {
            let coverage = mask_coverage(Rgba([v, v, v, 255])) as i32;
            assert!((coverage - (255 - v as i32)).abs() <= 1, "gray {} gave {}", v, coverage);
        }
    }

    #[test]
    fn test_mask_coverage_weights_green_most() {
        let red = mask_coverage(Rgba([255, 0, 0, 255]));
        let green = mask_coverage(Rgba([0, 255, 0, 255]));
        let blue = mask_coverage(Rgba([0, 0, 255, 255]));
        assert!(green < red && red < blue, "{} {} {}", red, green, blue);
    }

    #[test]
    fn test_image_mask_black_passes_white_suppresses() {
        // Left half black, right half white
        let mask = RasterImage::new(RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let out = mask_with_image(&create_test_image(10, 10), &mask, &opts()).unwrap();
        assert_eq!(px(&out, 1, 5), [255, 0, 0, 255]);
        assert_eq!(px(&out, 8, 5)[3], 0);
    }

    #[test]
    fn test_image_mask_gray_blends() {
        let mask = RasterImage::new(RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255])));
        let out = mask_with_image(&create_test_image(4, 4), &mask, &opts()).unwrap();
        let alpha = px(&out, 2, 2)[3] as i32;
        assert!((alpha - 127).abs() <= 2, "alpha {}", alpha);
    }

    #[test]
    fn test_image_mask_is_stretched_to_image() {
        // Top row black, bottom row white; stretched over 20x20
        let mask = RasterImage::new(RgbaImage::from_fn(1, 2, |_, y| {
            if y == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let options = RenderOptions {
            filter: crate::FilterType::Nearest,
            ..RenderOptions::default()
        };
        let out = mask_with_image(&create_test_image(20, 20), &mask, &options).unwrap();
        assert_eq!(px(&out, 10, 2), [255, 0, 0, 255]);
        assert_eq!(px(&out, 10, 17)[3], 0);
    }

    #[test]
    fn test_image_mask_empty_mask_fails() {
        let result = mask_with_image(&create_test_image(4, 4), &RasterImage::new(RgbaImage::new(0, 3)), &opts());
        assert_eq!(result.unwrap_err(), RenderError::MaskUnavailable);
    }

    #[test]
    fn test_fit_path_wide_path_fits_width() {
        // 2:1 path into a 1:1 target
        let path = Path::rectangle(Rect::new(0.0, 0.0, 40.0, 20.0));
        let target = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bounds = fit_path(&path, target).bounds().unwrap();
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(bounds.origin, Point::new(0.0, 25.0));
    }

    #[test]
    fn test_fit_path_tall_path_fits_height() {
        let path = Path::rectangle(Rect::new(10.0, 10.0, 10.0, 40.0));
        let target = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bounds = fit_path(&path, target).bounds().unwrap();
        assert_eq!(bounds.height(), 100.0);
        assert_eq!(bounds.width(), 25.0);
        assert_eq!(bounds.origin, Point::new(37.5, 0.0));
    }

    #[test]
    fn test_fit_path_without_extent_is_unchanged() {
        let dot = Path::new(Point::new(3.0, 3.0)).add_line(Point::new(3.0, 3.0));
        let target = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(fit_path(&dot, target), dot);
    }

    #[test]
    fn test_path_mask_receives_logical_rect() {
        let img = create_test_image(30, 20).with_scale(2.0);
        let mut seen = None;
        mask_with_path(
            &img,
            |rect| {
                seen = Some(rect);
                Path::rectangle(rect)
            },
            &opts(),
        )
        .unwrap();
        assert_eq!(seen, Some(Rect::new(0.0, 0.0, 15.0, 10.0)));
    }

    #[test]
    fn test_path_mask_clips_to_fitted_triangle() {
        // Triangle pointing down, in arbitrary units; fitted to 40x40
        let out = mask_with_path(
            &create_test_image(40, 40),
            |_| {
                Path::new(Point::new(0.0, 0.0))
                    .add_line(Point::new(4.0, 0.0))
                    .add_line(Point::new(2.0, 4.0))
                    .close()
            },
            &opts(),
        )
        .unwrap();
        assert_eq!(px(&out, 20, 2), [255, 0, 0, 255]);
        assert_eq!(px(&out, 2, 37)[3], 0);
        assert_eq!(px(&out, 37, 37)[3], 0);
    }

    #[test]
    fn test_path_mask_with_empty_path_is_transparent() {
        let out = mask_with_path(&create_test_image(8, 8), |rect| Path::new(rect.center()), &opts()).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_rounded_rect_border_ring() {
        let border = Border::new(4.0, Color::BLUE);
        let out = mask_with_rounded_rect(&create_test_image(100, 100), 20.0, &border, &opts()).unwrap();
        assert_eq!(px(&out, 0, 0)[3], 0);
        assert_eq!(px(&out, 50, 50), [255, 0, 0, 255]);
        assert_eq!(px(&out, 50, 1), [0, 0, 255, 255]);
        assert_eq!(px(&out, 1, 50), [0, 0, 255, 255]);
        assert_eq!(px(&out, 50, 7), [255, 0, 0, 255]);
    }

    #[test]
    fn test_corners_with_zero_radius_keep_every_pixel() {
        let out = mask_with_corners(&create_test_image(10, 10), &Corner::zero(), &Border::none(), &opts()).unwrap();
        assert!(out.pixels().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_oversized_radius_is_clamped_to_ellipse() {
        let img = create_test_image(30, 30);
        let out = mask_with_rounded_rect(&img, 1000.0, &Border::none(), &opts()).unwrap();
        assert_eq!(px(&out, 15, 15), [255, 0, 0, 255]);
        assert_eq!(px(&out, 15, 2), [255, 0, 0, 255]);
        assert_eq!(px(&out, 1, 1)[3], 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
