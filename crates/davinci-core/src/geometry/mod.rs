//! Geometry primitives: points, sizes, rectangles and coordinate conventions.
//!
//! # Coordinate Conventions
//!
//! Two conventions exist for where a drawing surface puts its origin:
//!
//! - [`OriginConvention::TopLeft`]: y grows downwards, "top" means smaller y
//! - [`OriginConvention::BottomLeft`]: y grows upwards, "top" means larger y
//!
//! The convention is resolved once at build time ([`OriginConvention::NATIVE`],
//! switched by the `bottom-left-origin` feature). Accessors that depend on it
//! take the convention as an argument; the `*_point` shorthands use `NATIVE`.

mod point;
mod rect;

pub use point::{Point, Size};
pub use rect::Rect;

use serde::{Deserialize, Serialize};

/// Where the origin of a drawing surface sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginConvention {
    /// Origin in the top-left corner, y grows downwards.
    TopLeft,
    /// Origin in the bottom-left corner, y grows upwards.
    BottomLeft,
}

impl OriginConvention {
    /// The convention selected for this build.
    #[cfg(not(feature = "bottom-left-origin"))]
    pub const NATIVE: OriginConvention = OriginConvention::TopLeft;

    /// The convention selected for this build.
    #[cfg(feature = "bottom-left-origin")]
    pub const NATIVE: OriginConvention = OriginConvention::BottomLeft;

    /// Signed y delta that moves a point visually upwards by `distance`.
    #[inline]
    pub fn upward(self, distance: f32) -> f32 {
        match self {
            OriginConvention::TopLeft => -distance,
            OriginConvention::BottomLeft => distance,
        }
    }
}

impl Default for OriginConvention {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// Platform-agnostic directions on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// Offset `(dx, dy)` for moving `distance` towards this direction.
    pub fn delta(self, distance: f32, origin: OriginConvention) -> (f32, f32) {
        match self {
            Direction::Top => (0.0, origin.upward(distance)),
            Direction::Right => (distance, 0.0),
            Direction::Bottom => (0.0, -origin.upward(distance)),
            Direction::Left => (-distance, 0.0),
        }
    }
}

/// Axis of a mirror operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flip {
    /// Mirror across a horizontal line `y = axis`.
    Vertically,
    /// Mirror across a vertical line `x = axis`.
    Horizontally,
}

/// Convert an angle in degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}
