// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A region made of non-overlapping rectangles.

use smallvec::SmallVec;

use crate::kurbo::{Point, Rect};

/// A union of axis-aligned rectangles which never overlap each other.
///
/// Rectangles that touch along an edge are not merged, so two lists covering
/// the same region may compare unequal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RectList {
    rects: SmallVec<[Rect; 4]>,
}

impl RectList {
    /// Creates an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a region covering a single rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let mut list = Self::new();
        list.add(rect);
        list
    }

    /// Whether the region covers no area.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of rectangles in the region.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// The rectangles making up the region.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Iterates over the rectangles making up the region.
    pub fn iter(&self) -> impl Iterator<Item = Rect> + '_ {
        self.rects.iter().copied()
    }

    /// The smallest rectangle enclosing the whole region, or [`Rect::ZERO`] when empty.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.rects.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(*first, |acc, r| acc.union(*r))
    }

    /// Adds `rect` to the region.
    ///
    /// Only the parts of `rect` not already covered are stored.
    pub fn add(&mut self, rect: Rect) {
        if !has_area(&rect) {
            return;
        }
        let mut pieces: SmallVec<[Rect; 4]> = SmallVec::new();
        pieces.push(rect);
        for existing in &self.rects {
            let mut remaining = SmallVec::new();
            for piece in pieces {
                push_difference(piece, *existing, &mut remaining);
            }
            pieces = remaining;
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Removes `rect` from the region, splitting any rectangle it cuts through.
    pub fn subtract(&mut self, rect: Rect) {
        if !has_area(&rect) {
            return;
        }
        let mut out = SmallVec::new();
        for r in self.rects.drain(..) {
            push_difference(r, rect, &mut out);
        }
        self.rects = out;
    }

    /// Intersects the region with `rect`.
    pub fn clip_to_rect(&mut self, rect: Rect) {
        if !has_area(&rect) {
            self.rects.clear();
            return;
        }
        self.rects.retain(|r| {
            *r = r.intersect(rect);
            has_area(r)
        });
    }

    /// Intersects the region with another region.
    pub fn clip_to_list(&mut self, other: &Self) {
        // Pairwise intersections of two disjoint sets stay disjoint.
        let mut out = SmallVec::new();
        for a in &self.rects {
            for b in &other.rects {
                let r = a.intersect(*b);
                if has_area(&r) {
                    out.push(r);
                }
            }
        }
        self.rects = out;
    }

    /// Whether some part of the region overlaps `rect` with non-zero area.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        has_area(&rect) && self.rects.iter().any(|r| overlaps(r, &rect))
    }

    /// Whether `point` lies inside the region.
    ///
    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains_point(&self, point: Point) -> bool {
        self.rects
            .iter()
            .any(|r| point.x >= r.x0 && point.x < r.x1 && point.y >= r.y0 && point.y < r.y1)
    }
}

fn has_area(r: &Rect) -> bool {
    r.x1 > r.x0 && r.y1 > r.y0
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Pushes the parts of `r` outside `cut`, at most four bands.
fn push_difference(r: Rect, cut: Rect, out: &mut SmallVec<[Rect; 4]>) {
    if !overlaps(&r, &cut) {
        out.push(r);
        return;
    }
    if cut.y0 > r.y0 {
        out.push(Rect::new(r.x0, r.y0, r.x1, cut.y0));
    }
    if cut.y1 < r.y1 {
        out.push(Rect::new(r.x0, cut.y1, r.x1, r.y1));
    }
    let y0 = r.y0.max(cut.y0);
    let y1 = r.y1.min(cut.y1);
    if cut.x0 > r.x0 {
        out.push(Rect::new(r.x0, y0, cut.x0, y1));
    }
    if cut.x1 < r.x1 {
        out.push(Rect::new(cut.x1, y0, r.x1, y1));
    }
}
