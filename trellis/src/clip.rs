// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip regions and the clip half of the clip/transform tracker.

use std::cell::Cell;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::geometry::{
    is_finite_path, preserves_axis_alignment, rects_to_path, IntRect, Path,
};
use crate::kurbo::{Affine, BezPath, Rect};
use crate::peniko::{Fill, ImageData};
use crate::rect_list::RectList;
use crate::target::RenderTarget;
use crate::GraphicsContext;

/// A non-rectangular constraint on the clip, in device space.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// Only pixels inside the path may be drawn.
    Path {
        /// Outline in device space.
        path: Arc<BezPath>,
        /// Winding rule for the outline.
        fill_rule: Fill,
    },
    /// Pixels are scaled by the alpha channel of an image.
    ImageAlpha {
        /// The mask image.
        image: ImageData,
        /// Maps image pixels to device space.
        transform: Affine,
    },
}

/// The tagged variant of a [`ClipRegion`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipKind {
    /// A single axis-aligned rectangle.
    Rectangle,
    /// A union of axis-aligned rectangles, possibly empty.
    RectangleList,
    /// Rectangles further constrained by at least one path.
    Path,
    /// Rectangles further constrained by at least one image-alpha mask.
    ImageAlpha,
}

/// The set of device pixels eligible to receive drawing output.
///
/// The region is the intersection of a rectangle list with every shape in
/// [`shapes`](Self::shapes). While there are no shapes the rectangle list is
/// exact; afterwards it is an upper bound which shapes can only shrink.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipRegion {
    rects: RectList,
    shapes: SmallVec<[ClipShape; 2]>,
}

impl ClipRegion {
    /// A clip admitting everything inside `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            rects: RectList::from_rect(bounds),
            shapes: SmallVec::new(),
        }
    }

    /// Which variant the region currently is.
    pub fn kind(&self) -> ClipKind {
        if self
            .shapes
            .iter()
            .any(|s| matches!(s, ClipShape::ImageAlpha { .. }))
        {
            ClipKind::ImageAlpha
        } else if !self.shapes.is_empty() {
            ClipKind::Path
        } else if self.rects.len() == 1 {
            ClipKind::Rectangle
        } else {
            ClipKind::RectangleList
        }
    }

    /// Whether the region admits no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangular part of the region.
    pub fn rects(&self) -> &RectList {
        &self.rects
    }

    /// Paths and masks which further constrain [`rects`](Self::rects).
    pub fn shapes(&self) -> &[ClipShape] {
        &self.shapes
    }

    /// Device-space bounds of the region.
    pub fn bounds(&self) -> Rect {
        self.rects.bounds()
    }

    /// Whether `rect` might receive output.
    ///
    /// Exact while the region is made of rectangles only; otherwise it may
    /// answer `true` for a rectangle that misses every shape.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        self.rects.intersects_rect(rect)
    }

    pub(crate) fn clip_to_rect(&mut self, rect: Rect) {
        self.rects.clip_to_rect(rect);
        self.drop_shapes_if_empty();
    }

    pub(crate) fn clip_to_list(&mut self, list: &RectList) {
        self.rects.clip_to_list(list);
        self.drop_shapes_if_empty();
    }

    pub(crate) fn exclude_rect(&mut self, rect: Rect) {
        self.rects.subtract(rect);
        self.drop_shapes_if_empty();
    }

    pub(crate) fn clip_to_path(&mut self, path: BezPath, fill_rule: Fill) {
        self.rects.clip_to_rect(path.control_box());
        if !self.rects.is_empty() {
            self.shapes.push(ClipShape::Path {
                path: Arc::new(path),
                fill_rule,
            });
        }
        self.drop_shapes_if_empty();
    }

    pub(crate) fn clip_to_image_alpha(&mut self, image: ImageData, transform: Affine) {
        let image_rect = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        self.rects
            .clip_to_rect(transform.transform_rect_bbox(image_rect));
        if !self.rects.is_empty() {
            self.shapes.push(ClipShape::ImageAlpha { image, transform });
        }
        self.drop_shapes_if_empty();
    }

    fn drop_shapes_if_empty(&mut self) {
        if self.rects.is_empty() {
            self.shapes.clear();
        }
    }
}

/// A cached copy of the user-space clip bounds.
///
/// Only ever used to reject queries early; cleared whenever the clip or the
/// transform changes.
#[derive(Debug, Default)]
pub(crate) struct ClipBoundsHint(Cell<Option<IntRect>>);

impl ClipBoundsHint {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> IntRect) -> IntRect {
        if let Some(bounds) = self.0.get() {
            return bounds;
        }
        let bounds = compute();
        self.0.set(Some(bounds));
        bounds
    }

    pub(crate) fn invalidate(&self) {
        self.0.set(None);
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self) -> bool {
        self.0.get().is_some()
    }
}

impl<T: RenderTarget> GraphicsContext<T> {
    /// Intersects the clip with `rect`, given in user space.
    ///
    /// Returns whether the resulting clip is non-empty.
    pub fn clip_to_rectangle(&mut self, rect: IntRect) -> bool {
        self.clip_to_rectangle_list(&[rect])
    }

    /// Intersects the clip with the union of `rects`, given in user space.
    ///
    /// An empty list empties the clip. Returns whether the resulting clip is
    /// non-empty.
    pub fn clip_to_rectangle_list(&mut self, rects: &[IntRect]) -> bool {
        if self.state.clip.is_empty() {
            return false;
        }
        let device = self.device_transform();
        let user_rects = rects.iter().filter(|r| !r.is_empty()).map(IntRect::to_rect);
        if preserves_axis_alignment(&device) {
            let mut list = RectList::new();
            for rect in user_rects {
                list.add(device.transform_rect_bbox(rect));
            }
            self.state.clip.clip_to_list(&list);
        } else {
            let mut path = rects_to_path(user_rects);
            path.apply_affine(device);
            self.state.clip.clip_to_path(path, Fill::NonZero);
        }
        self.clip_changed();
        !self.state.clip.is_empty()
    }

    /// Removes `rect`, given in user space, from the clip.
    pub fn exclude_clip_rectangle(&mut self, rect: IntRect) {
        if rect.is_empty() || self.state.clip.is_empty() {
            return;
        }
        let device = self.device_transform();
        if preserves_axis_alignment(&device) {
            self.state
                .clip
                .exclude_rect(device.transform_rect_bbox(rect.to_rect()));
        } else {
            let mut remaining = RectList::from_rect(self.clip_bounds().to_rect());
            remaining.subtract(rect.to_rect());
            let mut path = rects_to_path(remaining.iter());
            path.apply_affine(device);
            self.state.clip.clip_to_path(path, Fill::NonZero);
        }
        self.clip_changed();
    }

    /// Intersects the clip with the fill region of `path`, mapped by
    /// `transform` and then by the context transform.
    ///
    /// A path with non-finite coordinates leaves the clip untouched.
    pub fn clip_to_path(&mut self, path: &Path, transform: Affine) {
        if !is_finite_path(&path.outline) || !transform.is_finite() {
            log::debug!("ignoring clip to a non-finite path");
            return;
        }
        if self.state.clip.is_empty() {
            return;
        }
        let mut outline = path.outline.clone();
        outline.apply_affine(self.device_transform() * transform);
        if path.is_empty() {
            self.state.clip.clip_to_rect(Rect::ZERO);
        } else {
            self.state.clip.clip_to_path(outline, path.fill_rule);
        }
        self.clip_changed();
    }

    /// Intersects the clip with the alpha channel of `image`, whose pixel grid
    /// is mapped by `transform` and then by the context transform.
    ///
    /// Partially transparent pixels give a soft edge rather than a hard one.
    pub fn clip_to_image_alpha(&mut self, image: &ImageData, transform: Affine) {
        if !transform.is_finite() {
            log::debug!("ignoring clip to an image with a non-finite transform");
            return;
        }
        if self.state.clip.is_empty() {
            return;
        }
        if image.width == 0 || image.height == 0 {
            self.state.clip.clip_to_rect(Rect::ZERO);
        } else {
            self.state
                .clip
                .clip_to_image_alpha(image.clone(), self.device_transform() * transform);
        }
        self.clip_changed();
    }

    /// Whether drawing inside `rect`, given in user space, could touch any pixel.
    ///
    /// Never answers `false` for a rectangle that would receive output. For
    /// clips made only of rectangles under an axis-aligned transform the
    /// answer is exact.
    pub fn clip_region_intersects(&self, rect: IntRect) -> bool {
        if rect.is_empty() || self.state.clip.is_empty() {
            return false;
        }
        if !self.clip_bounds().intersects(rect) {
            return false;
        }
        let device = self.device_transform();
        self.state
            .clip
            .intersects_rect(device.transform_rect_bbox(rect.to_rect()))
    }

    /// The smallest integer rectangle, in user space, enclosing the clip.
    pub fn clip_bounds(&self) -> IntRect {
        self.clip_hint.get_or_compute(|| {
            if self.state.clip.is_empty() {
                return IntRect::default();
            }
            let device = self.device_transform();
            if device.determinant() == 0.0 {
                return IntRect::default();
            }
            IntRect::from_rect_outward(
                device
                    .inverse()
                    .transform_rect_bbox(self.state.clip.bounds()),
            )
        })
    }

    /// Whether the clip excludes all drawing.
    pub fn is_clip_empty(&self) -> bool {
        self.state.clip.is_empty()
    }

    /// The current clip region, in device space.
    pub fn clip_region(&self) -> &ClipRegion {
        &self.state.clip
    }
}
