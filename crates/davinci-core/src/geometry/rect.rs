//! Axis-aligned rectangles with convention-aware corner accessors.

use serde::{Deserialize, Serialize};

use super::{OriginConvention, Point, Size};

/// An origin plus a size.
///
/// The "origin" is the corner with the smallest coordinates. Which logical
/// corner that is depends on the [`OriginConvention`]: in the top-left
/// convention the origin is the top-left corner, in the bottom-left convention
/// it is the bottom-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rect of the given size anchored at (0, 0).
    pub fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// A rect of the given size centered on `center`.
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            origin: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// The visually top-left corner under `origin`.
    pub fn top_left(&self, origin: OriginConvention) -> Point {
        match origin {
            OriginConvention::TopLeft => self.origin,
            OriginConvention::BottomLeft => Point::new(self.min_x(), self.max_y()),
        }
    }

    /// The visually top-right corner under `origin`.
    pub fn top_right(&self, origin: OriginConvention) -> Point {
        match origin {
            OriginConvention::TopLeft => Point::new(self.max_x(), self.min_y()),
            OriginConvention::BottomLeft => Point::new(self.max_x(), self.max_y()),
        }
    }

    /// The visually bottom-left corner under `origin`.
    pub fn bottom_left(&self, origin: OriginConvention) -> Point {
        match origin {
            OriginConvention::TopLeft => Point::new(self.min_x(), self.max_y()),
            OriginConvention::BottomLeft => self.origin,
        }
    }

    /// The visually bottom-right corner under `origin`.
    pub fn bottom_right(&self, origin: OriginConvention) -> Point {
        match origin {
            OriginConvention::TopLeft => Point::new(self.max_x(), self.max_y()),
            OriginConvention::BottomLeft => Point::new(self.max_x(), self.min_y()),
        }
    }

    /// Top-left corner under the build's native convention.
    pub fn top_left_point(&self) -> Point {
        self.top_left(OriginConvention::NATIVE)
    }

    /// Top-right corner under the build's native convention.
    pub fn top_right_point(&self) -> Point {
        self.top_right(OriginConvention::NATIVE)
    }

    /// Bottom-left corner under the build's native convention.
    pub fn bottom_left_point(&self) -> Point {
        self.bottom_left(OriginConvention::NATIVE)
    }

    /// Bottom-right corner under the build's native convention.
    pub fn bottom_right_point(&self) -> Point {
        self.bottom_right(OriginConvention::NATIVE)
    }

    /// Shrink the rect by `dx` on the left and right and `dy` on the top and bottom.
    ///
    /// Negative insets grow the rect.
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width - 2.0 * dx,
            self.size.height - 2.0 * dy,
        )
    }

    /// Convert to a `tiny_skia` rect. `None` for empty or non-finite rects.
    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.origin.x, self.origin.y, self.size.width, self.size.height)
    }
}
