//! DaVinci Core - Image compositing and polyline path toolkit
//!
//! This crate resizes, masks, crops and overlays bitmap images, and builds
//! simple polyline vector paths (move/line/close) that are drawn into an
//! off-screen raster canvas.
//!
//! # Overview
//!
//! - [`path`]: immutable, append-only paths with flipping, concatenation and
//!   directional line building
//! - [`orientation`]: turns EXIF-tagged pixel buffers upright
//! - [`resize`]: clip / crop / scale fitting
//! - [`mask`]: ellipse, rounded-rect, arbitrary path and image-luminance masks
//! - [`layer`]: draw one image over another
//! - [`context`]: the scoped raster canvas and drawing context the operations
//!   are built on
//!
//! Every operation reads its inputs and returns a new [`RasterImage`], or a
//! [`RenderError`] when no image could be produced.

pub mod arrow;
pub mod codec;
pub mod context;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod mask;
pub mod orientation;
pub mod path;
pub mod pipeline;
pub mod raster;
pub mod resize;

pub use arrow::{arrow, ArrowDirection};
pub use codec::{decode, encode_png};
pub use context::{render, render_with, FilterType, GraphicsContext, RenderOptions};
pub use error::RenderError;
pub use geometry::{Direction, Flip, OriginConvention, Point, Rect, Size};
pub use layer::overlay;
pub use mask::{
    fit_path, mask_with_corners, mask_with_ellipse, mask_with_image, mask_with_path,
    mask_with_rounded_rect,
};
pub use orientation::{normalize, orientation_transform, upright};
pub use path::{concat, Path, PathAction};
pub use pipeline::DaVinci;
pub use raster::{Orientation, RasterImage};
pub use resize::{resize, FitMode};

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) 8-bit sRGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(p: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}

/// Where a border stroke sits relative to the masked shape's edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BorderAlignment {
    /// Fully inside the shape.
    #[default]
    Inside,
    /// Centered on the edge; half of it is clipped away.
    Center,
    /// Centered half a width outside the edge.
    Outside,
}

/// An optional stroke drawn around a mask shape.
///
/// A width of zero draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub width: f32,
    pub color: Color,
    pub alignment: BorderAlignment,
}

impl Border {
    /// Inside-aligned border.
    pub fn new(width: f32, color: Color) -> Self {
        Self {
            width,
            color,
            alignment: BorderAlignment::Inside,
        }
    }

    /// No border.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: BorderAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// True when the border draws anything.
    pub fn is_visible(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }

    /// Signed distance to inset the shape's rect by before stroking.
    pub fn inset(&self) -> f32 {
        match self.alignment {
            BorderAlignment::Inside => self.width / 2.0,
            BorderAlignment::Center => 0.0,
            BorderAlignment::Outside => -self.width / 2.0,
        }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::new(0.0, Color::WHITE)
    }
}

/// Independent radii for the four corners of a rounded rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl Corner {
    pub fn new(top_left: f32, top_right: f32, bottom_left: f32, bottom_right: f32) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Same radius on every corner.
    pub fn uniform(radius: f32) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// The largest of the four radii.
    pub fn max_radius(&self) -> f32 {
        self.top_left
            .max(self.top_right)
            .max(self.bottom_left)
            .max(self.bottom_right)
    }

    pub fn is_all_equal(&self) -> bool {
        self.top_left == self.top_right
            && self.top_left == self.bottom_left
            && self.top_left == self.bottom_right
    }

    /// Every radius clamped into `0..=limit`.
    pub fn clamped(&self, limit: f32) -> Corner {
        let clamp = |r: f32| if r.is_finite() { r.clamp(0.0, limit.max(0.0)) } else { 0.0 };
        Corner::new(
            clamp(self.top_left),
            clamp(self.top_right),
            clamp(self.bottom_left),
            clamp(self.bottom_right),
        )
    }
}
