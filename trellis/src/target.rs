// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the graphics context and a native renderer.

use crate::clip::ClipRegion;
use crate::kurbo::{Affine, BezPath, Rect, Stroke};
use crate::paint::ResolvedPaint;
use crate::peniko::{Fill, FontData, ImageData, ImageQuality};
use crate::Result;

/// A glyph placed in device space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    /// Glyph identifier within the font.
    pub id: u32,
    /// Maps em space (y pointing down, one unit per em) to device space.
    pub transform: Affine,
}

/// A renderer driven by [`GraphicsContext`](crate::GraphicsContext).
///
/// All geometry handed to a target is already in device space: the context's
/// transform and its vertical flip have both been applied. Device space has
/// its y axis pointing up, with the origin at the bottom-left corner of
/// [`device_bounds`](Self::device_bounds).
///
/// A target never tracks transforms. It only holds the most recent clip set
/// through [`set_clip`](Self::set_clip), which every draw must honour.
pub trait RenderTarget {
    /// The drawable area in device space.
    fn device_bounds(&self) -> Rect;

    /// Whether the target records vector output, like a printer, rather than pixels.
    fn is_vector_device(&self) -> bool {
        false
    }

    /// Replaces the clip applied to subsequent draws.
    fn set_clip(&mut self, clip: &ClipRegion) -> Result<()>;

    /// Fills `path`, mapped by `transform`, with `paint`.
    fn fill_path(
        &mut self,
        path: &BezPath,
        fill_rule: Fill,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()>;

    /// Fills `rect`, mapped by `transform`, with `paint`.
    ///
    /// When `replace` is set, covered pixels take the paint's value, alpha
    /// included, instead of blending with what is already there.
    fn fill_rect(
        &mut self,
        rect: Rect,
        transform: Affine,
        paint: &ResolvedPaint,
        replace: bool,
    ) -> Result<()>;

    /// Strokes `path`, mapped by `transform`, with `paint`.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()>;

    /// Draws `image` once, with its pixel grid mapped by `transform`.
    fn draw_image(
        &mut self,
        image: &ImageData,
        transform: Affine,
        opacity: f32,
        quality: ImageQuality,
    ) -> Result<()>;

    /// Fills the outlines of `glyphs` from `font` with `paint`.
    fn fill_glyphs(&mut self, font: &FontData, glyphs: &[Glyph], paint: &ResolvedPaint)
        -> Result<()>;

    /// Starts an isolated group which is blended with `opacity` when popped.
    fn push_layer(&mut self, opacity: f32) -> Result<()>;

    /// Composites the innermost group onto the content beneath it.
    fn pop_layer(&mut self) -> Result<()>;
}

macro_rules! forward_render_target {
    () => {
        fn device_bounds(&self) -> Rect {
            (**self).device_bounds()
        }

        fn is_vector_device(&self) -> bool {
            (**self).is_vector_device()
        }

        fn set_clip(&mut self, clip: &ClipRegion) -> Result<()> {
            (**self).set_clip(clip)
        }

        fn fill_path(
            &mut self,
            path: &BezPath,
            fill_rule: Fill,
            transform: Affine,
            paint: &ResolvedPaint,
        ) -> Result<()> {
            (**self).fill_path(path, fill_rule, transform, paint)
        }

        fn fill_rect(
            &mut self,
            rect: Rect,
            transform: Affine,
            paint: &ResolvedPaint,
            replace: bool,
        ) -> Result<()> {
            (**self).fill_rect(rect, transform, paint, replace)
        }

        fn stroke_path(
            &mut self,
            path: &BezPath,
            stroke: &Stroke,
            transform: Affine,
            paint: &ResolvedPaint,
        ) -> Result<()> {
            (**self).stroke_path(path, stroke, transform, paint)
        }

        fn draw_image(
            &mut self,
            image: &ImageData,
            transform: Affine,
            opacity: f32,
            quality: ImageQuality,
        ) -> Result<()> {
            (**self).draw_image(image, transform, opacity, quality)
        }

        fn fill_glyphs(
            &mut self,
            font: &FontData,
            glyphs: &[Glyph],
            paint: &ResolvedPaint,
        ) -> Result<()> {
            (**self).fill_glyphs(font, glyphs, paint)
        }

        fn push_layer(&mut self, opacity: f32) -> Result<()> {
            (**self).push_layer(opacity)
        }

        fn pop_layer(&mut self) -> Result<()> {
            (**self).pop_layer()
        }
    };
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    forward_render_target!();
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    forward_render_target!();
}
