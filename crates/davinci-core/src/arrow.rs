//! Chevron arrow images drawn with the path engine.

use serde::{Deserialize, Serialize};

use crate::context::render;
use crate::error::RenderError;
use crate::geometry::{Point, Rect, Size};
use crate::path::Path;
use crate::raster::RasterImage;
use crate::Color;

/// Side of the reference grid the arrow shape is defined on.
const REFERENCE: f32 = 66.0;

/// Which way an arrow points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArrowDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

/// Upper and lower strokes of a left-pointing chevron filling `rect`.
fn left_chevron(rect: Rect) -> Path {
    let cal = |units: f32, extent: f32| units / REFERENCE * extent;
    let (w, h) = (rect.width(), rect.height());
    let mid_y = rect.mid_y();

    let upper = Path::new(Point::new(cal(11.0, w), mid_y))
        .add_line(Point::new(cal(44.5, w), 0.0))
        .add_line(Point::new(cal(54.0, w), cal(9.5, h)))
        .add_line(Point::new(cal(30.0, w), mid_y))
        .close();
    let lower = upper.flip_vertically(mid_y);

    upper + lower
}

/// Render a `square` x `square` arrow image at scale 1.
///
/// # Arguments
///
/// * `direction` - Where the chevron points
/// * `square` - Side length of the output
/// * `color` - Fill color of the chevron
/// * `background` - Fill for the whole square; transparent when `None`
///
/// # Errors
///
/// Returns `RenderError::InvalidSize` if `square` is not positive.
pub fn arrow(
    direction: ArrowDirection,
    square: f32,
    color: Color,
    background: Option<Color>,
) -> Result<RasterImage, RenderError> {
    render(Size::new(square, square), 1.0, |size, ctx| {
        let rect = Rect::from_size(size);

        if let Some(background) = background {
            ctx.draw(|ctx| {
                ctx.begin_path();
                ctx.add_rect(rect);
                ctx.set_fill_color(background);
                ctx.fill_path();
            });
        }

        let chevron = left_chevron(rect);
        match direction {
            ArrowDirection::Left => ctx.fill(&chevron, color),
            ArrowDirection::Right => ctx.fill(&chevron.flip_horizontally(rect.mid_x()), color),
            ArrowDirection::Up => {
                ctx.rotate_clockwise(rect.center(), 90.0);
                ctx.fill(&chevron, color);
            }
            ArrowDirection::Down => {
                ctx.rotate_clockwise(rect.center(), -90.0);
                ctx.fill(&chevron, color);
            }
        }
        Ok(())
    })
}
