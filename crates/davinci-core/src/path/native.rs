//! Conversion of [`Path`] into the rasterizer's path type.

use tiny_skia::PathBuilder;

use super::{Path, PathAction};

impl Path {
    /// Convert to a `tiny_skia::Path` for filling, stroking or clipping.
    ///
    /// Returns `None` when the path draws nothing (only moves or closes) or
    /// holds non-finite coordinates.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut builder = PathBuilder::with_capacity(self.actions.len(), self.actions.len());
        for action in self.actions.iter() {
            match *action {
                PathAction::Move(p) => builder.move_to(p.x, p.y),
                PathAction::AddLine(p) => builder.line_to(p.x, p.y),
                PathAction::Close => builder.close(),
            }
        }
        builder.finish()
    }
}
