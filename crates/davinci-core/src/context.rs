//! Off-screen raster canvas and drawing context.
//!
//! [`render`] and [`render_with`] acquire a canvas of a logical size at a
//! device scale, hand a [`GraphicsContext`] to a drawing closure, and return
//! the canvas contents as a new [`RasterImage`]. The context is owned by the
//! call: it is released on every exit path, including an early `Err` from the
//! closure, and a failed draw never yields an image.
//!
//! The context follows the usual immediate-mode model: a current
//! transformation matrix (CTM), a current path built with the `add_*`
//! methods, a clip region, fill/stroke colors and a line width, with
//! `save`/`restore` for the state. Painting (`fill_path`, `stroke_path`,
//! `clip`) consumes the current path.
//!
//! Coordinates are logical units in the context's [`OriginConvention`]. The
//! backing `tiny_skia::Pixmap` is top-left origin; bottom-left contexts get a
//! y-flip in their base transform.

use std::borrow::Cow;

use image::{imageops, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pattern, Pixmap,
    PixmapPaint, SpreadMode, Stroke, Transform,
};
use tracing::{trace, warn};

use crate::error::RenderError;
use crate::geometry::{OriginConvention, Point, Rect, Size};
use crate::orientation::normalize;
use crate::path::Path;
use crate::raster::{Orientation, RasterImage};
use crate::{Color, Corner};

/// Cubic Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Largest canvas [`render_with`] will allocate, in pixels (16384 x 16384).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Filter type for resampling drawn images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Bicubic interpolation (slower, sharpest).
    Bicubic,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::Bicubic => imageops::FilterType::CatmullRom,
        }
    }

    /// Convert to the rasterizer's pattern sampling quality.
    pub fn to_filter_quality(self) -> FilterQuality {
        match self {
            FilterType::Nearest => FilterQuality::Nearest,
            FilterType::Bilinear => FilterQuality::Bilinear,
            FilterType::Bicubic => FilterQuality::Bicubic,
        }
    }
}

/// Rendering settings shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Resampling filter for drawn images.
    pub filter: FilterType,
    /// Anti-alias path edges, clips and strokes.
    pub anti_alias: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Bilinear,
            anti_alias: true,
        }
    }
}

/// Premultiply a straight-alpha buffer into a pixmap.
pub(crate) fn pixmap_from_rgba(pixels: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = pixels.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(RenderError::EmptyImage)?;

    let mut data = Vec::with_capacity(pixels.as_raw().len());
    for p in pixels.pixels() {
        let [r, g, b, a] = p.0;
        let c = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Pixmap::from_vec(data, size).ok_or(RenderError::CanvasAllocation { width, height })
}

/// Zeroed pixmap, or `None` when the size exceeds [`MAX_CANVAS_PIXELS`] or
/// the buffer cannot be reserved.
fn allocate_pixmap(width: u32, height: u32) -> Option<Pixmap> {
    let size = IntSize::from_wh(width, height)?;
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_CANVAS_PIXELS {
        return None;
    }
    let len = usize::try_from(pixels).ok()?.checked_mul(4)?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).ok()?;
    data.resize(len, 0u8);
    Pixmap::from_vec(data, size)
}

/// Demultiply a pixmap into a straight-alpha buffer.
pub(crate) fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Closed rounded rectangle with per-corner radii.
///
/// Corner names are resolved under `origin`; radii must already be clamped.
fn rounded_rect_path(rect: Rect, corners: &Corner, origin: OriginConvention) -> Option<tiny_skia::Path> {
    let (x0, y0, x1, y1) = (rect.min_x(), rect.min_y(), rect.max_x(), rect.max_y());
    // Radii in min/max order: (x0,y0), (x1,y0), (x1,y1), (x0,y1)
    let [r0, r1, r2, r3] = match origin {
        OriginConvention::TopLeft => [
            corners.top_left,
            corners.top_right,
            corners.bottom_right,
            corners.bottom_left,
        ],
        OriginConvention::BottomLeft => [
            corners.bottom_left,
            corners.bottom_right,
            corners.top_right,
            corners.top_left,
        ],
    };
    let k = 1.0 - KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r0, y0);
    pb.line_to(x1 - r1, y0);
    pb.cubic_to(x1 - r1 * k, y0, x1, y0 + r1 * k, x1, y0 + r1);
    pb.line_to(x1, y1 - r2);
    pb.cubic_to(x1, y1 - r2 * k, x1 - r2 * k, y1, x1 - r2, y1);
    pb.line_to(x0 + r3, y1);
    pb.cubic_to(x0 + r3 * k, y1, x0, y1 - r3 * k, x0, y1 - r3);
    pb.line_to(x0, y0 + r0);
    pb.cubic_to(x0, y0 + r0 * k, x0 + r0 * k, y0, x0 + r0, y0);
    pb.close();
    pb.finish()
}

#[derive(Clone)]
struct DrawState {
    transform: Transform,
    clip: Option<Mask>,
    fill: Color,
    stroke: Color,
    line_width: f32,
}

/// Drawing context over an off-screen canvas.
///
/// Obtained through [`render`] / [`render_with`] only.
pub struct GraphicsContext {
    pixmap: Pixmap,
    size: Size,
    scale: f32,
    origin: OriginConvention,
    options: RenderOptions,
    state: DrawState,
    saved: Vec<DrawState>,
    /// Current path, already in device space.
    path: PathBuilder,
}

impl GraphicsContext {
    fn begin(
        size: Size,
        scale: f32,
        origin: OriginConvention,
        options: RenderOptions,
    ) -> Result<Self, RenderError> {
        let invalid = RenderError::InvalidSize {
            width: size.width,
            height: size.height,
        };
        if size.is_empty() || !(scale.is_finite() && scale > 0.0) {
            warn!(width = size.width, height = size.height, scale, "Invalid canvas size requested");
            return Err(invalid);
        }

        let width = (size.width * scale).round();
        let height = (size.height * scale).round();
        if width < 1.0 || height < 1.0 {
            warn!(width = size.width, height = size.height, scale, "Canvas rounds to zero pixels");
            return Err(invalid);
        }
        let (width, height) = (width as u32, height as u32);

        let pixmap = allocate_pixmap(width, height).ok_or_else(|| {
            warn!(width, height, "Failed to allocate raster canvas");
            RenderError::CanvasAllocation { width, height }
        })?;

        let transform = match origin {
            OriginConvention::TopLeft => Transform::from_scale(scale, scale),
            OriginConvention::BottomLeft => {
                Transform::from_row(scale, 0.0, 0.0, -scale, 0.0, height as f32)
            }
        };

        trace!(width, height, scale, ?origin, "Canvas acquired");
        Ok(Self {
            pixmap,
            size,
            scale,
            origin,
            options,
            state: DrawState {
                transform,
                clip: None,
                fill: Color::BLACK,
                stroke: Color::BLACK,
                line_width: 1.0,
            },
            saved: Vec::new(),
            path: PathBuilder::new(),
        })
    }

    fn finish(self) -> RasterImage {
        trace!(width = self.pixmap.width(), height = self.pixmap.height(), "Canvas released");
        RasterImage::from_parts(rgba_from_pixmap(&self.pixmap), self.scale, Orientation::Normal)
    }

    /// Logical size of the canvas.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Full logical rect of the canvas.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn origin(&self) -> OriginConvention {
        self.origin
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The current transformation matrix, user space to device pixels.
    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    // ------------------------------------------------------------------
    // Graphics state
    // ------------------------------------------------------------------

    /// Push a copy of the graphics state.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Pop the last saved graphics state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Run `f` between a `save` and a `restore`.
    pub fn draw<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let result = f(self);
        self.restore();
        result
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    /// Stroke width in user-space units.
    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    // ------------------------------------------------------------------
    // Transformation matrix
    // ------------------------------------------------------------------

    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        self.concatenate(Transform::from_translate(dx, dy));
    }

    pub fn scale_by(&mut self, sx: f32, sy: f32) {
        self.concatenate(Transform::from_scale(sx, sy));
    }

    /// Rotate user space by `radians` (from +x towards +y).
    pub fn rotate(&mut self, radians: f32) {
        self.concatenate(Transform::from_rotate(radians.to_degrees()));
    }

    /// Apply `transform` to user space before the current matrix.
    pub fn concatenate(&mut self, transform: Transform) {
        self.state.transform = self.state.transform.pre_concat(transform);
    }

    /// Rotate user space by `degrees` (from +x towards +y) about `pivot`.
    pub fn rotate_around(&mut self, pivot: Point, degrees: f32) {
        self.translate_by(pivot.x, pivot.y);
        self.concatenate(Transform::from_rotate(degrees));
        self.translate_by(-pivot.x, -pivot.y);
    }

    /// Rotate about `pivot` so positive angles turn clockwise on screen.
    pub fn rotate_clockwise(&mut self, pivot: Point, degrees: f32) {
        match self.origin {
            OriginConvention::TopLeft => self.rotate_around(pivot, degrees),
            OriginConvention::BottomLeft => self.rotate_around(pivot, -degrees),
        }
    }

    // ------------------------------------------------------------------
    // Current path
    // ------------------------------------------------------------------

    /// Discard the current path.
    pub fn begin_path(&mut self) {
        self.path = PathBuilder::new();
    }

    fn push_user_path(&mut self, path: Option<tiny_skia::Path>) {
        if let Some(device) = path.and_then(|p| p.transform(self.state.transform)) {
            self.path.push_path(&device);
        }
    }

    fn take_path(&mut self) -> Option<tiny_skia::Path> {
        std::mem::replace(&mut self.path, PathBuilder::new()).finish()
    }

    /// Append a Path Engine path to the current path.
    pub fn add_path(&mut self, path: &Path) {
        self.push_user_path(path.to_skia_path());
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.push_user_path(rect.to_skia().map(PathBuilder::from_rect));
    }

    /// Append the ellipse inscribed in `rect`.
    pub fn add_ellipse(&mut self, rect: Rect) {
        self.push_user_path(rect.to_skia().and_then(PathBuilder::from_oval));
    }

    /// Append a rounded rectangle. Radii are clamped to half the shorter side.
    pub fn add_rounded_rect(&mut self, rect: Rect, corners: &Corner) {
        if rect.size.is_empty() {
            return;
        }
        let limit = rect.width().min(rect.height()) / 2.0;
        let corners = corners.clamped(limit);
        self.push_user_path(rounded_rect_path(rect, &corners, self.origin));
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = self.options.anti_alias;
        paint
    }

    /// Fill the current path with the fill color (non-zero winding).
    pub fn fill_path(&mut self) {
        let Some(path) = self.take_path() else {
            return;
        };
        let paint = self.paint(self.state.fill);
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    /// Stroke the current path with the stroke color and line width.
    pub fn stroke_path(&mut self) {
        let Some(path) = self.take_path() else {
            return;
        };
        let ts = self.state.transform;
        let width = self.state.line_width * (ts.sx * ts.sy - ts.kx * ts.ky).abs().sqrt();
        if !(width.is_finite() && width > 0.0) {
            return;
        }
        let paint = self.paint(self.state.stroke);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    /// Intersect the clip region with the current path.
    ///
    /// Clipping to an empty path clips everything away.
    pub fn clip(&mut self) {
        let path = self.take_path();
        let aa = self.options.anti_alias;
        if let Some(mask) = self.state.clip.as_mut() {
            match path {
                Some(path) => mask.intersect_path(&path, FillRule::Winding, aa, Transform::identity()),
                None => mask.data_mut().fill(0),
            }
            return;
        }
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        if let Some(path) = path {
            mask.fill_path(&path, FillRule::Winding, aa, Transform::identity());
        }
        self.state.clip = Some(mask);
    }

    pub fn clip_to_rect(&mut self, rect: Rect) {
        self.begin_path();
        self.add_rect(rect);
        self.clip();
    }

    /// Intersect the clip region with a device-space coverage mask.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::MaskUnavailable` if the mask does not match the
    /// canvas pixel dimensions.
    pub fn clip_to_mask(&mut self, coverage: &Mask) -> Result<(), RenderError> {
        if coverage.width() != self.pixmap.width() || coverage.height() != self.pixmap.height() {
            return Err(RenderError::MaskUnavailable);
        }
        if let Some(mask) = self.state.clip.as_mut() {
            for (dst, src) in mask.data_mut().iter_mut().zip(coverage.data()) {
                *dst = ((*dst as u16 * *src as u16 + 127) / 255) as u8;
            }
        } else {
            self.state.clip = Some(coverage.clone());
        }
        Ok(())
    }

    /// Fill the whole canvas with `color`, ignoring clip and transform.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Fill `path` with `color`, leaving the graphics state untouched.
    pub fn fill(&mut self, path: &Path, color: Color) {
        self.draw(|ctx| {
            ctx.begin_path();
            ctx.add_path(path);
            ctx.set_fill_color(color);
            ctx.fill_path();
        });
    }

    /// Stroke `path` with `color` at the current line width.
    pub fn stroke(&mut self, path: &Path, color: Color) {
        self.draw(|ctx| {
            ctx.begin_path();
            ctx.add_path(path);
            ctx.set_stroke_color(color);
            ctx.stroke_path();
        });
    }

    /// Draw `image` upright into `rect`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::EmptyImage` if the image holds no pixels.
    pub fn draw_image(&mut self, image: &RasterImage, rect: Rect) -> Result<(), RenderError> {
        let pixels = normalize(image)?;
        self.draw_pixels(&pixels, rect)
    }

    /// Draw an upright pixel buffer stretched into `rect`.
    ///
    /// Row 0 of the buffer lands on the visual top edge of `rect`: bottom-left
    /// contexts flip the image (scale y by -1, translate by -height) so it is
    /// not drawn upside down. Axis-aligned draws no larger than the canvas are
    /// resampled with the `image` crate first and blitted; larger or rotated
    /// draws are sampled by the rasterizer over the visible area only.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::EmptyImage` if the buffer holds no pixels.
    pub fn draw_pixels(&mut self, pixels: &RgbaImage, rect: Rect) -> Result<(), RenderError> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(RenderError::EmptyImage);
        }
        if rect.size.is_empty() || !rect.origin.x.is_finite() || !rect.origin.y.is_finite() {
            return Ok(());
        }

        let sx = rect.width() / w as f32;
        let sy = rect.height() / h as f32;
        let image_ts = match self.origin {
            OriginConvention::TopLeft => Transform::from_row(sx, 0.0, 0.0, sy, rect.min_x(), rect.min_y()),
            OriginConvention::BottomLeft => {
                Transform::from_row(sx, 0.0, 0.0, -sy, rect.min_x(), rect.max_y())
            }
        };
        let ts = self.state.transform.pre_concat(image_ts);

        if ts.kx == 0.0 && ts.ky == 0.0 {
            self.blit_axis_aligned(pixels, ts)
        } else {
            let src = pixmap_from_rgba(pixels)?;
            let paint = PixmapPaint {
                quality: self.options.filter.to_filter_quality(),
                ..PixmapPaint::default()
            };
            self.pixmap
                .draw_pixmap(0, 0, src.as_ref(), &paint, ts, self.state.clip.as_ref());
            Ok(())
        }
    }

    fn blit_axis_aligned(&mut self, pixels: &RgbaImage, ts: Transform) -> Result<(), RenderError> {
        let (w, h) = pixels.dimensions();
        let dw = w as f32 * ts.sx;
        let dh = h as f32 * ts.sy;
        let left = ts.tx.min(ts.tx + dw);
        let top = ts.ty.min(ts.ty + dh);
        let (canvas_w, canvas_h) = (self.pixmap.width(), self.pixmap.height());

        let visible = tiny_skia::Rect::from_ltrb(
            left.max(0.0),
            top.max(0.0),
            (left + dw.abs()).min(canvas_w as f32),
            (top + dh.abs()).min(canvas_h as f32),
        );
        let Some(visible) = visible else {
            return Ok(());
        };

        let tw = dw.abs().round() as u32;
        let th = dh.abs().round() as u32;
        if tw == 0 || th == 0 {
            return Ok(());
        }
        if tw > canvas_w || th > canvas_h {
            return self.fill_visible(pixels, ts, visible);
        }

        let mut resampled = if (tw, th) == (w, h) {
            Cow::Borrowed(pixels)
        } else {
            Cow::Owned(imageops::resize(pixels, tw, th, self.options.filter.to_image_filter()))
        };
        if ts.sx < 0.0 {
            resampled = Cow::Owned(imageops::flip_horizontal(resampled.as_ref()));
        }
        if ts.sy < 0.0 {
            resampled = Cow::Owned(imageops::flip_vertical(resampled.as_ref()));
        }
        let src = pixmap_from_rgba(&resampled)?;

        let (ix, iy) = (left.round(), top.round());
        let clip = self.state.clip.as_ref();
        if (left - ix).abs() < 1e-3 && (top - iy).abs() < 1e-3 {
            let paint = PixmapPaint {
                quality: FilterQuality::Nearest,
                ..PixmapPaint::default()
            };
            self.pixmap
                .draw_pixmap(ix as i32, iy as i32, src.as_ref(), &paint, Transform::identity(), clip);
        } else {
            let paint = PixmapPaint {
                quality: self.options.filter.to_filter_quality(),
                ..PixmapPaint::default()
            };
            self.pixmap
                .draw_pixmap(0, 0, src.as_ref(), &paint, Transform::from_translate(left, top), clip);
        }
        Ok(())
    }

    /// Paint `visible` (device space) with `pixels` mapped through `ts`.
    fn fill_visible(
        &mut self,
        pixels: &RgbaImage,
        ts: Transform,
        visible: tiny_skia::Rect,
    ) -> Result<(), RenderError> {
        let src = pixmap_from_rgba(pixels)?;
        let paint = Paint {
            shader: Pattern::new(
                src.as_ref(),
                SpreadMode::Pad,
                self.options.filter.to_filter_quality(),
                1.0,
                ts,
            ),
            anti_alias: self.options.anti_alias,
            ..Paint::default()
        };
        trace!(
            left = visible.left(),
            top = visible.top(),
            right = visible.right(),
            bottom = visible.bottom(),
            "Sampling oversized draw over visible area"
        );
        self.pixmap
            .fill_rect(visible, &paint, Transform::identity(), self.state.clip.as_ref());
        Ok(())
    }
}

/// Draw into a fresh transparent canvas with the native origin convention and
/// default options.
///
/// See [`render_with`].
pub fn render<F>(size: Size, scale: f32, draw: F) -> Result<RasterImage, RenderError>
where
    F: FnOnce(Size, &mut GraphicsContext) -> Result<(), RenderError>,
{
    render_with(size, scale, OriginConvention::NATIVE, RenderOptions::default(), draw)
}

/// Draw into a fresh transparent canvas and return its contents.
///
/// # Arguments
///
/// * `size` - Logical canvas size
/// * `scale` - Device pixels per logical unit; the canvas is
///   `round(size * scale)` pixels
/// * `origin` - Coordinate convention of the context handed to `draw`
/// * `options` - Sampling and anti-aliasing settings
/// * `draw` - Drawing callback, receives the logical size and the context
///
/// # Returns
///
/// An upright image of the canvas at `scale`.
///
/// # Errors
///
/// Returns `RenderError::InvalidSize` for an empty size or a non-positive
/// scale, `RenderError::CanvasAllocation` if the canvas exceeds
/// [`MAX_CANVAS_PIXELS`] or cannot be allocated,
/// and any error returned by `draw`.
pub fn render_with<F>(
    size: Size,
    scale: f32,
    origin: OriginConvention,
    options: RenderOptions,
    draw: F,
) -> Result<RasterImage, RenderError>
where
    F: FnOnce(Size, &mut GraphicsContext) -> Result<(), RenderError>,
{
    let mut ctx = GraphicsContext::begin(size, scale, origin, options)?;
    draw(size, &mut ctx)?;
    Ok(ctx.finish())
}
