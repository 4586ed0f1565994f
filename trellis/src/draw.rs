// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing operations of [`GraphicsContext`].

use smallvec::SmallVec;

use crate::geometry::{
    is_drawable_rect, is_drawable_width, is_finite_line, is_finite_path, rects_to_path, IntRect,
    Path,
};
use crate::kurbo::{Affine, BezPath, Cap, Join, Line, Point, Rect, Shape, Stroke};
use crate::peniko::{Fill, ImageData};
use crate::target::{Glyph, RenderTarget};
use crate::{Error, GraphicsContext, Result};

impl<T: RenderTarget> GraphicsContext<T> {
    /// Fills the whole clip region with the current fill.
    pub fn fill_all(&mut self) -> Result<()> {
        let bounds = self.clip_bounds();
        self.fill_int_rect(bounds, false)
    }

    /// Fills an integer rectangle with the current fill.
    ///
    /// With `replace_existing_contents` set, covered pixels are overwritten,
    /// alpha included, instead of being blended with what is already there.
    pub fn fill_int_rect(&mut self, rect: IntRect, replace_existing_contents: bool) -> Result<()> {
        if rect.is_empty() {
            log::debug!("skipping fill of empty rectangle {rect:?}");
            return Ok(());
        }
        self.fill_rect_impl(rect.to_rect(), replace_existing_contents)
    }

    /// Fills a rectangle with the current fill.
    pub fn fill_rect(&mut self, rect: Rect) -> Result<()> {
        if !is_drawable_rect(&rect) {
            log::debug!("skipping fill of degenerate rectangle {rect:?}");
            return Ok(());
        }
        self.fill_rect_impl(rect, false)
    }

    fn fill_rect_impl(&mut self, rect: Rect, replace: bool) -> Result<()> {
        if self.state.clip.is_empty() {
            return Ok(());
        }
        let transform = self.device_transform();
        let Some(paint) = self.resolve_paint(transform)? else {
            return Ok(());
        };
        self.sync_clip()?;
        self.target.fill_rect(rect, transform, &paint, replace)
    }

    /// Fills the union of `rects` with the current fill.
    ///
    /// Overlapping rectangles are covered once, not blended twice.
    pub fn fill_rect_list(&mut self, rects: &[Rect]) -> Result<()> {
        let drawable: SmallVec<[Rect; 8]> =
            rects.iter().copied().filter(is_drawable_rect).collect();
        if drawable.is_empty() {
            return Ok(());
        }
        if let [rect] = drawable.as_slice() {
            return self.fill_rect_impl(*rect, false);
        }
        self.fill_outline(&rects_to_path(drawable), Fill::NonZero, Affine::IDENTITY)
    }

    /// Fills `path`, mapped by `transform` and then by the context transform.
    ///
    /// The current fill is positioned in user space, unaffected by `transform`.
    pub fn fill_path(&mut self, path: &Path, transform: Affine) -> Result<()> {
        if path.is_empty() || !is_finite_path(&path.outline) || !transform.is_finite() {
            log::debug!("skipping fill of empty or non-finite path");
            return Ok(());
        }
        self.fill_outline(&path.outline, path.fill_rule, transform)
    }

    fn fill_outline(
        &mut self,
        outline: &BezPath,
        fill_rule: Fill,
        transform: Affine,
    ) -> Result<()> {
        if self.state.clip.is_empty() {
            return Ok(());
        }
        let device = self.device_transform();
        let Some(paint) = self.resolve_paint(device)? else {
            return Ok(());
        };
        self.sync_clip()?;
        self.target
            .fill_path(outline, fill_rule, device * transform, &paint)
    }

    /// Strokes `path`, mapped by `transform` and then by the context transform.
    ///
    /// The stroke width is measured in the path's own coordinate space.
    pub fn stroke_path(&mut self, path: &Path, stroke: &Stroke, transform: Affine) -> Result<()> {
        if path.is_empty() || !is_finite_path(&path.outline) || !transform.is_finite() {
            log::debug!("skipping stroke of empty or non-finite path");
            return Ok(());
        }
        self.stroke_outline(&path.outline, stroke, transform)
    }

    fn stroke_outline(
        &mut self,
        outline: &BezPath,
        stroke: &Stroke,
        transform: Affine,
    ) -> Result<()> {
        if !is_drawable_width(stroke.width) {
            log::debug!("skipping stroke with width {}", stroke.width);
            return Ok(());
        }
        if self.state.clip.is_empty() {
            return Ok(());
        }
        let device = self.device_transform();
        let Some(paint) = self.resolve_paint(device)? else {
            return Ok(());
        };
        self.sync_clip()?;
        self.target
            .stroke_path(outline, stroke, device * transform, &paint)
    }

    /// Strokes `line` with the default line width and square caps.
    pub fn draw_line(&mut self, line: Line) -> Result<()> {
        self.draw_line_with_thickness(line, self.options.line_width)
    }

    /// Strokes `line` with square caps and the given width.
    pub fn draw_line_with_thickness(&mut self, line: Line, width: f64) -> Result<()> {
        if !is_finite_line(&line) {
            log::debug!("skipping non-finite line {line:?}");
            return Ok(());
        }
        let mut outline = BezPath::new();
        outline.move_to(line.p0);
        outline.line_to(line.p1);
        let stroke = Stroke::new(width).with_caps(Cap::Square);
        self.stroke_outline(&outline, &stroke, Affine::IDENTITY)
    }

    /// Strokes the outline of `rect`, keeping the stroke inside it.
    pub fn draw_rect(&mut self, rect: Rect, line_width: f64) -> Result<()> {
        if !is_drawable_rect(&rect) || !is_drawable_width(line_width) {
            return Ok(());
        }
        let inset = rect.inset(-line_width / 2.0);
        if !is_drawable_rect(&inset) {
            return self.fill_rect(rect);
        }
        let stroke = Stroke::new(line_width).with_join(Join::Miter);
        self.stroke_outline(&rects_to_path([inset]), &stroke, Affine::IDENTITY)
    }

    /// Fills the ellipse inscribed in `rect`.
    pub fn fill_ellipse(&mut self, rect: Rect) -> Result<()> {
        if !is_drawable_rect(&rect) {
            return Ok(());
        }
        let outline = rect.to_ellipse().to_path(self.options.tolerance);
        self.fill_outline(&outline, Fill::NonZero, Affine::IDENTITY)
    }

    /// Strokes the ellipse inscribed in `rect`.
    pub fn draw_ellipse(&mut self, rect: Rect, line_width: f64) -> Result<()> {
        if !is_drawable_rect(&rect) || !is_drawable_width(line_width) {
            return Ok(());
        }
        let outline = rect.to_ellipse().to_path(self.options.tolerance);
        self.stroke_outline(&outline, &Stroke::new(line_width), Affine::IDENTITY)
    }

    /// Fills `rect` with its corners rounded by `corner_size`.
    pub fn fill_rounded_rectangle(&mut self, rect: Rect, corner_size: f64) -> Result<()> {
        if !is_drawable_rect(&rect) || !corner_size.is_finite() {
            return Ok(());
        }
        let outline = rect
            .to_rounded_rect(corner_size.max(0.0))
            .to_path(self.options.tolerance);
        self.fill_outline(&outline, Fill::NonZero, Affine::IDENTITY)
    }

    /// Strokes `rect` with its corners rounded by `corner_size`.
    pub fn draw_rounded_rectangle(
        &mut self,
        rect: Rect,
        corner_size: f64,
        line_width: f64,
    ) -> Result<()> {
        if !is_drawable_rect(&rect)
            || !corner_size.is_finite()
            || !is_drawable_width(line_width)
        {
            return Ok(());
        }
        let outline = rect
            .to_rounded_rect(corner_size.max(0.0))
            .to_path(self.options.tolerance);
        self.stroke_outline(&outline, &Stroke::new(line_width), Affine::IDENTITY)
    }

    /// Draws `image` once, with its pixel grid mapped by `transform` and then
    /// by the context transform.
    ///
    /// The current opacity and interpolation quality apply; the current fill
    /// does not.
    pub fn draw_image(&mut self, image: &ImageData, transform: Affine) -> Result<()> {
        if image.width == 0 || image.height == 0 || !transform.is_finite() {
            log::debug!("skipping draw of empty image or non-finite transform");
            return Ok(());
        }
        if self.state.clip.is_empty() {
            return Ok(());
        }
        let device = self.device_transform() * transform;
        self.sync_clip()?;
        self.target
            .draw_image(image, device, self.state.opacity, self.state.quality)
    }

    /// Draws a run of glyphs from the current font with the current fill.
    ///
    /// `positions` holds the user-space baseline origin of each glyph, mapped
    /// by `transform` and then by the context transform. It must have one
    /// entry per glyph id.
    pub fn draw_glyphs(
        &mut self,
        glyph_ids: &[u32],
        positions: &[Point],
        transform: Affine,
    ) -> Result<()> {
        if glyph_ids.len() != positions.len() {
            log::warn!(
                "glyph run has {} ids but {} positions",
                glyph_ids.len(),
                positions.len()
            );
            return Err(Error::GlyphCountMismatch {
                glyphs: glyph_ids.len(),
                positions: positions.len(),
            });
        }
        if glyph_ids.is_empty() || !transform.is_finite() || self.state.clip.is_empty() {
            return Ok(());
        }
        let Some(typeface) = self.state.font.typeface.clone() else {
            log::warn!("skipping glyph run: the current font has no typeface");
            return Ok(());
        };
        let Some(em_transform) = self.state.font.em_transform() else {
            log::debug!("skipping glyph run with unusable font metrics");
            return Ok(());
        };
        let device = self.device_transform();
        let Some(paint) = self.resolve_paint(device)? else {
            return Ok(());
        };
        let run_transform = device * transform;
        let glyphs: Vec<Glyph> = glyph_ids
            .iter()
            .zip(positions)
            .filter(|(_, position)| position.is_finite())
            .map(|(&id, &position)| Glyph {
                id,
                transform: run_transform * Affine::translate(position.to_vec2()) * em_transform,
            })
            .collect();
        if glyphs.is_empty() {
            return Ok(());
        }
        self.sync_clip()?;
        self.target.fill_glyphs(&typeface, &glyphs, &paint)
    }

    /// Draws a single glyph from the current font at the origin of `transform`.
    pub fn draw_glyph(&mut self, glyph_id: u32, transform: Affine) -> Result<()> {
        self.draw_glyphs(&[glyph_id], &[Point::ORIGIN], transform)
    }
}
