//! Individual path instructions.

use serde::{Deserialize, Serialize};

use crate::geometry::{Flip, Point};

/// One instruction in a polyline path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathAction {
    /// Start a new subpath at the point.
    Move(Point),
    /// Draw a straight segment from the current point to the point.
    AddLine(Point),
    /// Close the current subpath.
    Close,
}

impl PathAction {
    /// Destination point of the action, `None` for `Close`.
    pub fn point(&self) -> Option<Point> {
        match *self {
            PathAction::Move(p) | PathAction::AddLine(p) => Some(p),
            PathAction::Close => None,
        }
    }

    /// Apply `f` to the destination point, keeping the action kind.
    pub fn map_point(self, f: impl FnOnce(Point) -> Point) -> PathAction {
        match self {
            PathAction::Move(p) => PathAction::Move(f(p)),
            PathAction::AddLine(p) => PathAction::AddLine(f(p)),
            PathAction::Close => PathAction::Close,
        }
    }

    /// Mirror the action across the horizontal line `y = axis_y`.
    pub fn flip_vertically(self, axis_y: f32) -> PathAction {
        self.map_point(|p| p.flip_vertically(axis_y))
    }

    /// Mirror the action across the vertical line `x = axis_x`.
    pub fn flip_horizontally(self, axis_x: f32) -> PathAction {
        self.map_point(|p| p.flip_horizontally(axis_x))
    }

    /// Mirror the action across the given axis.
    pub fn flip(self, kind: Flip, axis: f32) -> PathAction {
        self.map_point(|p| p.flip(kind, axis))
    }
}
