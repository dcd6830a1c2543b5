//! Point and size value types.

use serde::{Deserialize, Serialize};

use super::Flip;

/// A real-valued 2D coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Mirror the point across the horizontal line `y = axis_y`.
    #[inline]
    pub fn flip_vertically(self, axis_y: f32) -> Point {
        Point::new(self.x, 2.0 * axis_y - self.y)
    }

    /// Mirror the point across the vertical line `x = axis_x`.
    #[inline]
    pub fn flip_horizontally(self, axis_x: f32) -> Point {
        Point::new(2.0 * axis_x - self.x, self.y)
    }

    /// Mirror the point across the given axis.
    pub fn flip(self, kind: Flip, axis: f32) -> Point {
        match kind {
            Flip::Horizontally => self.flip_horizontally(axis),
            Flip::Vertically => self.flip_vertically(axis),
        }
    }

    /// Return the point moved by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair in logical units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not a finite number.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Both dimensions multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}
