// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles, paths, and the checks used to skip malformed geometry.

use crate::kurbo::{Affine, BezPath, Line, PathEl, Point, Rect};
use crate::peniko::Fill;

/// Slack used when snapping float rectangles back onto the integer grid.
///
/// A rectangle that has been mapped by a transform and then by its inverse
/// lands within this distance of where it started.
const SNAP_EPSILON: f64 = 1e-6;

/// An axis-aligned rectangle on the integer grid.
///
/// The rectangle covers `x0..x1` horizontally and `y0..y1` vertically; it is
/// empty when either range is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl IntRect {
    /// Creates a rectangle from its edges.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Width of the rectangle, zero when empty.
    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0).max(0)
    }

    /// Height of the rectangle, zero when empty.
    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0).max(0)
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// The overlap of two rectangles, possibly empty.
    pub fn intersect(&self, other: Self) -> Self {
        Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }

    /// Whether the two rectangles share a region of non-zero area.
    pub fn intersects(&self, other: Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Converts to a float rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// The smallest integer rectangle containing `rect`.
    ///
    /// Edges within a tiny distance of an integer snap onto it instead of
    /// being pushed outwards. Non-finite input yields an empty rectangle.
    pub fn from_rect_outward(rect: Rect) -> Self {
        if !rect.is_finite() {
            return Self::default();
        }
        let rect = rect.abs();
        Self::new(
            snap(rect.x0.floor_with_slack()),
            snap(rect.y0.floor_with_slack()),
            snap(rect.x1.ceil_with_slack()),
            snap(rect.y1.ceil_with_slack()),
        )
    }
}

impl From<IntRect> for Rect {
    fn from(rect: IntRect) -> Self {
        rect.to_rect()
    }
}

trait SnapExt {
    fn floor_with_slack(self) -> f64;
    fn ceil_with_slack(self) -> f64;
}

impl SnapExt for f64 {
    fn floor_with_slack(self) -> f64 {
        (self + SNAP_EPSILON).floor()
    }

    fn ceil_with_slack(self) -> f64 {
        (self - SNAP_EPSILON).ceil()
    }
}

fn snap(v: f64) -> i32 {
    v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// A path outline together with the winding rule used to fill it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    /// The outline, made of move, line, curve and close segments.
    pub outline: BezPath,
    /// The rule that decides which regions are inside.
    pub fill_rule: Fill,
}

impl Path {
    /// Creates a path filled with the non-zero winding rule.
    pub fn new(outline: BezPath) -> Self {
        Self {
            outline,
            fill_rule: Fill::NonZero,
        }
    }

    /// Builder method for setting the winding rule.
    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: Fill) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Whether the outline contains no drawing segments.
    pub fn is_empty(&self) -> bool {
        !self
            .outline
            .elements()
            .iter()
            .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath))
    }

    /// The bounding box of the outline's control points.
    pub fn bounds(&self) -> Rect {
        self.outline.control_box()
    }
}

impl From<BezPath> for Path {
    fn from(outline: BezPath) -> Self {
        Self::new(outline)
    }
}

/// Whether a float rectangle has finite edges and a positive area.
pub(crate) fn is_drawable_rect(rect: &Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

pub(crate) fn is_finite_line(line: &Line) -> bool {
    line.p0.is_finite() && line.p1.is_finite()
}

/// Whether a stroke of this width would produce any coverage.
pub(crate) fn is_drawable_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

/// Whether every point in the outline is finite.
pub(crate) fn is_finite_path(path: &BezPath) -> bool {
    path.elements().iter().all(|el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
        PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
        PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
        PathEl::ClosePath => true,
    })
}

/// Whether the transform maps axis-aligned rectangles onto axis-aligned rectangles.
pub(crate) fn preserves_axis_alignment(transform: &Affine) -> bool {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    (b == 0.0 && c == 0.0) || (a == 0.0 && d == 0.0)
}

/// Builds a single outline covering all `rects`.
pub(crate) fn rects_to_path(rects: impl IntoIterator<Item = Rect>) -> BezPath {
    let mut path = BezPath::new();
    for rect in rects {
        path.move_to(Point::new(rect.x0, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y1));
        path.line_to(Point::new(rect.x0, rect.y1));
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outward_rounding_snaps_near_integers() {
        let r = IntRect::from_rect_outward(Rect::new(9.999_999_9, 0.2, 20.000_000_1, 4.5));
        assert_eq!(r, IntRect::new(10, 0, 20, 5));
    }

    #[test]
    fn outward_rounding_of_nan_is_empty() {
        let r = IntRect::from_rect_outward(Rect::new(f64::NAN, 0.0, 1.0, 1.0));
        assert!(r.is_empty());
    }

    #[test]
    fn int_rect_intersection() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(b), IntRect::new(5, 5, 10, 10));
        assert!(!a.intersects(IntRect::new(10, 0, 20, 10)));
    }

    #[test]
    fn full_range_rect_size_saturates() {
        let r = IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(r.width(), i32::MAX);
        assert_eq!(r.height(), i32::MAX);
        assert_eq!(IntRect::new(i32::MAX, 0, i32::MIN, 1).width(), 0);
    }

    #[test]
    fn quarter_turn_keeps_axis_alignment() {
        assert!(preserves_axis_alignment(&Affine::new([
            0.0, 1.0, -1.0, 0.0, 5.0, 0.0
        ])));
        assert!(preserves_axis_alignment(&Affine::FLIP_Y));
        assert!(!preserves_axis_alignment(&Affine::rotate(0.3)));
    }

    #[test]
    fn degenerate_paths() {
        let mut outline = BezPath::new();
        outline.move_to((1.0, 1.0));
        assert!(Path::new(outline.clone()).is_empty());
        outline.line_to((f64::INFINITY, 2.0));
        assert!(!is_finite_path(&outline));
    }
}
