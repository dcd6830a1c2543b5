//! Immutable polyline paths built from move/line/close actions.
//!
//! A [`Path`] is an ordered list of [`PathAction`]s plus the current point
//! (the destination of the last move or line). Every builder method returns a
//! new path; the action list is shared behind an `Arc` and only copied when a
//! shared list is appended to, so long builder chains stay linear.
//!
//! # Example
//!
//! ```ignore
//! use davinci_core::geometry::{Direction, Flip, Point, Rect};
//! use davinci_core::path::Path;
//!
//! let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let triangle = Path::new(rect.top_left_point())
//!     .add_line(rect.bottom_left_point())
//!     .add_line_towards([(Direction::Right, 100.0), (Direction::Top, 50.0)])
//!     .close();
//! let mirrored = triangle.flip(Flip::Horizontally, rect.mid_x());
//! ```

mod action;
mod native;

pub use action::PathAction;

use std::ops::Add;
use std::sync::Arc;

use crate::geometry::{Direction, Flip, OriginConvention, Point, Rect};

/// An immutable, append-only polyline path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    current_point: Point,
    actions: Arc<Vec<PathAction>>,
}

impl Path {
    /// Start a path with a single move to `point`.
    pub fn new(point: Point) -> Self {
        Self {
            current_point: point,
            actions: Arc::new(vec![PathAction::Move(point)]),
        }
    }

    /// Build a path from an explicit action list and current point.
    pub fn from_actions(point: Point, actions: Vec<PathAction>) -> Self {
        Self {
            current_point: point,
            actions: Arc::new(actions),
        }
    }

    /// Closed rectangle outline in the build's native convention.
    ///
    /// See [`Path::rectangle_in`].
    pub fn rectangle(rect: Rect) -> Self {
        Self::rectangle_in(rect, OriginConvention::NATIVE)
    }

    /// Closed outline starting at `rect.origin`, then top-right, bottom-right
    /// and bottom-left as resolved in `origin`, then close.
    ///
    /// In the bottom-left convention `rect.origin` is the bottom-left corner,
    /// so the polygon starts and ends there.
    pub fn rectangle_in(rect: Rect, origin: OriginConvention) -> Self {
        Path::new(rect.origin)
            .add_line(rect.top_right(origin))
            .add_line(rect.bottom_right(origin))
            .add_line(rect.bottom_left(origin))
            .close()
    }

    /// The destination of the last move or line.
    pub fn current_point(&self) -> Point {
        self.current_point
    }

    /// The actions in drawing order.
    pub fn actions(&self) -> &[PathAction] {
        &self.actions
    }

    /// Number of actions, including the initial move.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True only for a path built from an empty action list.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn push(mut self, action: PathAction) -> Self {
        Arc::make_mut(&mut self.actions).push(action);
        self
    }

    /// Append a move to `point`.
    pub fn move_to(mut self, point: Point) -> Self {
        self.current_point = point;
        self.push(PathAction::Move(point))
    }

    /// Append a straight line to `point`.
    pub fn add_line(mut self, point: Point) -> Self {
        self.current_point = point;
        self.push(PathAction::AddLine(point))
    }

    /// Append a close. The current point is unchanged.
    pub fn close(self) -> Self {
        self.push(PathAction::Close)
    }

    /// Append one line from the current point, moved by every
    /// `(direction, distance)` entry, in the native convention.
    ///
    /// See [`Path::add_line_towards_in`].
    pub fn add_line_towards<I>(self, directions: I) -> Self
    where
        I: IntoIterator<Item = (Direction, f32)>,
    {
        self.add_line_towards_in(directions, OriginConvention::NATIVE)
    }

    /// Append one line from the current point, moved by every
    /// `(direction, distance)` entry.
    ///
    /// Deltas are summed per axis before being applied, so the iteration order
    /// of a map argument does not change the destination.
    pub fn add_line_towards_in<I>(self, directions: I, origin: OriginConvention) -> Self
    where
        I: IntoIterator<Item = (Direction, f32)>,
    {
        let (dx, dy) = directions
            .into_iter()
            .map(|(direction, distance)| direction.delta(distance, origin))
            .fold((0.0f32, 0.0f32), |(ax, ay), (x, y)| (ax + x, ay + y));
        let destination = self.current_point.offset(dx, dy);
        self.add_line(destination)
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Path {
        Path {
            current_point: f(self.current_point),
            actions: Arc::new(self.actions.iter().map(|a| a.map_point(&f)).collect()),
        }
    }

    /// Mirror every point across the horizontal line `y = axis_y`.
    pub fn flip_vertically(&self, axis_y: f32) -> Path {
        self.map_points(|p| p.flip_vertically(axis_y))
    }

    /// Mirror every point across the vertical line `x = axis_x`.
    pub fn flip_horizontally(&self, axis_x: f32) -> Path {
        self.map_points(|p| p.flip_horizontally(axis_x))
    }

    /// Mirror every point across the given axis.
    pub fn flip(&self, kind: Flip, axis: f32) -> Path {
        match kind {
            Flip::Horizontally => self.flip_horizontally(axis),
            Flip::Vertically => self.flip_vertically(axis),
        }
    }

    /// Scale every point about the origin.
    pub fn scaled(&self, sx: f32, sy: f32) -> Path {
        self.map_points(|p| Point::new(p.x * sx, p.y * sy))
    }

    /// Move every point by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Path {
        self.map_points(|p| p.offset(dx, dy))
    }

    /// Bounding box of every move/line destination.
    ///
    /// `None` when the path holds no points.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.actions.iter().filter_map(PathAction::point);
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Append the actions of `rhs`; the current point becomes `rhs`'s.
    pub fn concat_with(mut self, rhs: &Path) -> Path {
        Arc::make_mut(&mut self.actions).extend_from_slice(&rhs.actions);
        self.current_point = rhs.current_point;
        self
    }

    /// Prepend the actions of `lhs`, i.e. `lhs + self`.
    pub fn concat_to(self, lhs: &Path) -> Path {
        lhs.clone().concat_with(&self)
    }
}

/// Concatenate two paths: `lhs` actions followed by `rhs` actions.
pub fn concat(lhs: &Path, rhs: &Path) -> Path {
    lhs.clone().concat_with(rhs)
}

impl Add for Path {
    type Output = Path;

    fn add(self, rhs: Path) -> Path {
        self.concat_with(&rhs)
    }
}

impl Add<&Path> for Path {
    type Output = Path;

    fn add(self, rhs: &Path) -> Path {
        self.concat_with(rhs)
    }
}

impl Add for &Path {
    type Output = Path;

    fn add(self, rhs: &Path) -> Path {
        concat(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_new_is_single_move() {
        let path = Path::new(p(1.0, 2.0));
        assert_eq!(path.actions(), &[PathAction::Move(p(1.0, 2.0))]);
        assert_eq!(path.current_point(), p(1.0, 2.0));
    }

    #[test]
    fn test_builder_tracks_current_point() {
        let path = Path::new(p(0.0, 0.0)).add_line(p(10.0, 0.0));
        assert_eq!(path.current_point(), p(10.0, 0.0));

        let path = path.move_to(p(5.0, 5.0));
        assert_eq!(path.current_point(), p(5.0, 5.0));

        let path = path.close();
        assert_eq!(path.current_point(), p(5.0, 5.0));
        assert_eq!(path.len(), 4);
        assert_eq!(path.actions()[3], PathAction::Close);
    }

    #[test]
    fn test_appending_to_a_clone_leaves_original_untouched() {
        let base = Path::new(p(0.0, 0.0)).add_line(p(1.0, 1.0));
        let extended = base.clone().add_line(p(2.0, 2.0));

        assert_eq!(base.len(), 2);
        assert_eq!(base.current_point(), p(1.0, 1.0));
        assert_eq!(extended.len(), 3);
        assert_eq!(extended.current_point(), p(2.0, 2.0));
    }

    #[test]
    fn test_rectangle_top_left() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let path = Path::rectangle_in(rect, OriginConvention::TopLeft);

        assert_eq!(
            path.actions(),
            &[
                PathAction::Move(p(10.0, 20.0)),
                PathAction::AddLine(p(40.0, 20.0)),
                PathAction::AddLine(p(40.0, 60.0)),
                PathAction::AddLine(p(10.0, 60.0)),
                PathAction::Close,
            ]
        );
        assert_eq!(path.current_point(), p(10.0, 60.0));
    }

    #[test]
    fn test_rectangle_bottom_left_starts_and_ends_at_origin() {
        let rect = Rect::new(5.0, 10.0, 30.0, 40.0);
        let path = Path::rectangle_in(rect, OriginConvention::BottomLeft);

        assert_eq!(
            path.actions(),
            &[
                PathAction::Move(p(5.0, 10.0)),
                PathAction::AddLine(p(35.0, 50.0)),
                PathAction::AddLine(p(35.0, 10.0)),
                PathAction::AddLine(p(5.0, 10.0)),
                PathAction::Close,
            ]
        );
        assert_eq!(path.current_point(), rect.origin);
    }

    #[test]
    fn test_add_line_towards_top_left() {
        let path = Path::new(p(10.0, 10.0)).add_line_towards_in(
            [(Direction::Right, 5.0), (Direction::Top, 3.0)],
            OriginConvention::TopLeft,
        );
        assert_eq!(path.current_point(), p(15.0, 7.0));
        assert_eq!(path.actions().last(), Some(&PathAction::AddLine(p(15.0, 7.0))));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_add_line_towards_bottom_left() {
        let path = Path::new(p(10.0, 10.0)).add_line_towards_in(
            [(Direction::Left, 5.0), (Direction::Top, 3.0)],
            OriginConvention::BottomLeft,
        );
        assert_eq!(path.current_point(), p(5.0, 13.0));
    }

    #[test]
    fn test_add_line_towards_opposite_directions_cancel() {
        let path = Path::new(p(1.0, 1.0)).add_line_towards_in(
            [
                (Direction::Left, 4.0),
                (Direction::Right, 4.0),
                (Direction::Top, 2.0),
                (Direction::Bottom, 2.0),
            ],
            OriginConvention::TopLeft,
        );
        assert_eq!(path.current_point(), p(1.0, 1.0));
    }

    #[test]
    fn test_add_line_towards_map_order_is_irrelevant() {
        let forward: HashMap<Direction, f32> = [
            (Direction::Top, 0.1),
            (Direction::Right, 0.7),
            (Direction::Bottom, 0.3),
            (Direction::Left, 0.2),
        ]
        .into_iter()
        .collect();
        let sorted: BTreeMap<Direction, f32> = forward.iter().map(|(k, v)| (*k, *v)).collect();
        let mut reversed: Vec<(Direction, f32)> = sorted.iter().map(|(k, v)| (*k, *v)).collect();
        reversed.reverse();

        let start = Path::new(p(0.3, 0.6));
        let a = start.clone().add_line_towards(forward);
        let b = start.clone().add_line_towards(sorted);
        let c = start.add_line_towards(reversed);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_flip_vertically_maps_every_point() {
        let path = Path::new(p(0.0, 0.0)).add_line(p(2.0, 4.0)).close();
        let flipped = path.flip_vertically(1.0);
        assert_eq!(
            flipped.actions(),
            &[
                PathAction::Move(p(0.0, 2.0)),
                PathAction::AddLine(p(2.0, -2.0)),
                PathAction::Close,
            ]
        );
        assert_eq!(flipped.current_point(), p(2.0, -2.0));
    }

    #[test]
    fn test_flip_dispatch() {
        let path = Path::new(p(1.0, 1.0)).add_line(p(3.0, 2.0));
        assert_eq!(path.flip(Flip::Horizontally, 0.0), path.flip_horizontally(0.0));
        assert_eq!(path.flip(Flip::Vertically, 5.0), path.flip_vertically(5.0));
    }

    #[test]
    fn test_concat_appends_without_merging() {
        let a = Path::new(p(0.0, 0.0)).add_line(p(1.0, 0.0)).close();
        let b = Path::new(p(5.0, 5.0)).add_line(p(6.0, 6.0));
        let joined = &a + &b;

        assert_eq!(joined.len(), a.len() + b.len());
        assert_eq!(&joined.actions()[..3], a.actions());
        assert_eq!(&joined.actions()[3..], b.actions());
        assert_eq!(joined.current_point(), b.current_point());
    }

    #[test]
    fn test_concat_variants_agree() {
        let a = Path::new(p(0.0, 0.0)).add_line(p(1.0, 0.0));
        let b = Path::new(p(2.0, 2.0)).add_line(p(3.0, 3.0));

        let via_op = a.clone() + b.clone();
        assert_eq!(concat(&a, &b), via_op);
        assert_eq!(a.clone().concat_with(&b), via_op);
        assert_eq!(b.concat_to(&a), via_op);
    }

    #[test]
    fn test_bounds() {
        let path = Path::new(p(-1.0, 2.0)).add_line(p(4.0, -3.0)).add_line(p(2.0, 5.0)).close();
        assert_eq!(path.bounds(), Some(Rect::new(-1.0, -3.0, 5.0, 8.0)));
        assert_eq!(Path::from_actions(Point::ZERO, vec![PathAction::Close]).bounds(), None);
    }

    #[test]
    fn test_scaled_and_translated() {
        let path = Path::new(p(1.0, 2.0)).add_line(p(3.0, 4.0));
        let moved = path.scaled(2.0, 3.0).translated(1.0, -1.0);
        assert_eq!(
            moved.actions(),
            &[PathAction::Move(p(3.0, 5.0)), PathAction::AddLine(p(7.0, 11.0))]
        );
        assert_eq!(moved.current_point(), p(7.0, 11.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coord() -> impl Strategy<Value = f32> {
        // Small integers keep the reflections exact in f32
        (-500i32..=500).prop_map(|v| v as f32)
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
    }

    fn action_strategy() -> impl Strategy<Value = PathAction> {
        prop_oneof![
            point_strategy().prop_map(PathAction::Move),
            point_strategy().prop_map(PathAction::AddLine),
            Just(PathAction::Close),
        ]
    }

    fn path_strategy() -> impl Strategy<Value = Path> {
        (point_strategy(), prop::collection::vec(action_strategy(), 0..12)).prop_map(
            |(start, actions)| {
                actions.into_iter().fold(Path::new(start), |path, action| match action {
                    PathAction::Move(pt) => path.move_to(pt),
                    PathAction::AddLine(pt) => path.add_line(pt),
                    PathAction::Close => path.close(),
                })
            },
        )
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (coord(), coord(), 1i32..=400, 1i32..=400)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w as f32, h as f32))
    }

    proptest! {
        /// Property: flipping vertically twice about the same axis is the identity.
        #[test]
        fn prop_flip_vertically_is_involution(path in path_strategy(), axis in coord()) {
            prop_assert_eq!(path.flip_vertically(axis).flip_vertically(axis), path);
        }

        /// Property: flipping horizontally twice about the same axis is the identity.
        #[test]
        fn prop_flip_horizontally_is_involution(path in path_strategy(), axis in coord()) {
            prop_assert_eq!(path.flip_horizontally(axis).flip_horizontally(axis), path);
        }

        /// Property: horizontal and vertical flips commute.
        #[test]
        fn prop_flips_commute(path in path_strategy(), ax in coord(), ay in coord()) {
            let xy = path.flip_horizontally(ax).flip_vertically(ay);
            let yx = path.flip_vertically(ay).flip_horizontally(ax);
            prop_assert_eq!(xy, yx);
        }

        /// Property: concatenation is associative.
        #[test]
        fn prop_concat_is_associative(
            a in path_strategy(),
            b in path_strategy(),
            c in path_strategy(),
        ) {
            let left = (&a + &b) + &c;
            let right = &a + &(&b + &c);
            prop_assert_eq!(left, right);
        }

        /// Property: the current point is the destination of the last move/line.
        #[test]
        fn prop_current_point_matches_last_destination(path in path_strategy()) {
            let last = path.actions().iter().rev().find_map(PathAction::point);
            prop_assert_eq!(last, Some(path.current_point()));
        }

        /// Property: a rectangle is a 5-action closed path starting at the rect origin.
        #[test]
        fn prop_rectangle_shape(rect in rect_strategy()) {
            for origin in [OriginConvention::TopLeft, OriginConvention::BottomLeft] {
                let path = Path::rectangle_in(rect, origin);
                prop_assert_eq!(path.len(), 5);
                prop_assert_eq!(path.actions()[0], PathAction::Move(rect.origin));
                prop_assert_eq!(path.actions()[4], PathAction::Close);
                prop_assert_eq!(path.bounds(), Some(rect));
            }
        }

        /// Property: in the bottom-left convention the first and last corners are the origin.
        #[test]
        fn prop_rectangle_bottom_left_closes_at_origin(rect in rect_strategy()) {
            let path = Path::rectangle_in(rect, OriginConvention::BottomLeft);
            let points: Vec<Point> = path.actions().iter().filter_map(PathAction::point).collect();
            prop_assert_eq!(points.first(), Some(&rect.origin));
            prop_assert_eq!(points.last(), Some(&rect.origin));
        }

        /// Property: add_line_towards does not depend on entry order.
        #[test]
        fn prop_add_line_towards_order_independent(
            start in point_strategy(),
            top in 0.0f32..100.0,
            right in 0.0f32..100.0,
            bottom in 0.0f32..100.0,
            left in 0.0f32..100.0,
        ) {
            let entries = [
                (Direction::Top, top),
                (Direction::Right, right),
                (Direction::Bottom, bottom),
                (Direction::Left, left),
            ];
            let mut reversed = entries;
            reversed.reverse();
            let mut rotated = entries;
            rotated.rotate_left(1);

            let base = Path::new(start);
            let a = base.clone().add_line_towards(entries).current_point();
            let b = base.clone().add_line_towards(reversed).current_point();
            let c = base.add_line_towards(rotated).current_point();
            prop_assert_eq!(a, b);
            prop_assert_eq!(b, c);
        }
    }
}
