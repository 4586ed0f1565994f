// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graphics context and its coordinate pipeline.

use crate::clip::{ClipBoundsHint, ClipRegion};
use crate::kurbo::Affine;
use crate::options::ContextOptions;
use crate::paint::{self, FillType, ResolvedPaint};
use crate::peniko::ImageQuality;
use crate::state::{Font, RenderState, StateStack};
use crate::target::RenderTarget;
use crate::Result;

/// An immediate-mode graphics context drawing into a [`RenderTarget`].
///
/// Callers work in user space, where the y axis points down. The context
/// keeps a transform from user space into an intermediate y-down space, and
/// flips that vertically about `flip_height` to reach the target's y-up
/// device space. Every emission to the target goes through both steps.
///
/// State changes are scoped by [`save_state`](Self::save_state) and
/// [`restore_state`](Self::restore_state).
#[derive(Debug)]
pub struct GraphicsContext<T: RenderTarget> {
    pub(crate) target: T,
    pub(crate) flip: Affine,
    pub(crate) options: ContextOptions,
    pub(crate) state: RenderState,
    pub(crate) stack: StateStack,
    pub(crate) clip_hint: ClipBoundsHint,
    /// Whether the target holds the current clip.
    pub(crate) clip_synced: bool,
}

impl<T: RenderTarget> GraphicsContext<T> {
    /// Creates a context drawing into `target` with default options.
    ///
    /// `flip_height` is the distance between the user-space origin and the
    /// device-space origin along the y axis, usually the target's height.
    pub fn new(target: T, flip_height: f32) -> Self {
        Self::with_options(target, flip_height, ContextOptions::default())
    }

    /// Creates a context drawing into `target`.
    pub fn with_options(target: T, flip_height: f32, options: ContextOptions) -> Self {
        let clip = ClipRegion::new(target.device_bounds());
        let state = RenderState {
            transform: Affine::IDENTITY,
            clip,
            fill: options.fill.clone(),
            opacity: 1.0,
            quality: options.quality,
            font: options.font.clone(),
        };
        Self {
            target,
            flip: Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, f64::from(flip_height)]),
            options,
            state,
            stack: StateStack::default(),
            clip_hint: ClipBoundsHint::default(),
            clip_synced: false,
        }
    }

    /// The render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Closes every open save scope and transparency layer, then returns the target.
    pub fn finish(mut self) -> Result<T> {
        self.unwind_to(0)?;
        Ok(self.target)
    }

    /// The current state, at the top of the state stack.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// The options this context was created with.
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Whether the target records vector output rather than pixels.
    pub fn is_vector_device(&self) -> bool {
        self.target.is_vector_device()
    }

    /// Moves the user-space origin to `(x, y)` in the current coordinate system.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.add_transform(Affine::translate((f64::from(x), f64::from(y))));
    }

    /// Composes `transform` onto the current transform.
    ///
    /// User-space coordinates are mapped through `transform` first, then
    /// through the existing transform. A non-finite transform is ignored.
    pub fn add_transform(&mut self, transform: Affine) {
        if !transform.is_finite() {
            log::debug!("ignoring non-finite transform {transform:?}");
            return;
        }
        self.state.transform *= transform;
        self.clip_hint.invalidate();
    }

    /// The transform from user space into the unflipped intermediate space.
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// The complete transform from user space into device space.
    pub fn device_transform(&self) -> Affine {
        self.flip * self.state.transform
    }

    /// How many device pixels one user-space unit covers, along each axis on average.
    pub fn physical_pixel_scale_factor(&self) -> f32 {
        self.device_transform().determinant().abs().sqrt() as f32
    }

    /// Replaces the fill used by subsequent fill operations.
    pub fn set_fill(&mut self, fill: impl Into<FillType>) {
        self.state.fill = fill.into();
    }

    /// The current fill.
    pub fn fill(&self) -> &FillType {
        &self.state.fill
    }

    /// Sets the opacity applied to fills and images, clamped to `0..=1`.
    ///
    /// NaN is ignored.
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_nan() {
            log::debug!("ignoring NaN opacity");
            return;
        }
        self.state.opacity = opacity.clamp(0.0, 1.0);
    }

    /// The current opacity.
    pub fn opacity(&self) -> f32 {
        self.state.opacity
    }

    /// Sets the resampling quality used when drawing images.
    pub fn set_interpolation_quality(&mut self, quality: ImageQuality) {
        self.state.quality = quality;
    }

    /// The current resampling quality.
    pub fn interpolation_quality(&self) -> ImageQuality {
        self.state.quality
    }

    /// Sets the font used by glyph runs.
    pub fn set_font(&mut self, font: Font) {
        self.state.font = font;
    }

    /// The current font.
    pub fn font(&self) -> &Font {
        &self.state.font
    }

    pub(crate) fn clip_changed(&mut self) {
        self.clip_hint.invalidate();
        self.clip_synced = false;
    }

    /// Sends the current clip to the target if it hasn't seen it yet.
    pub(crate) fn sync_clip(&mut self) -> Result<()> {
        if !self.clip_synced {
            self.target.set_clip(&self.state.clip)?;
            self.clip_synced = true;
        }
        Ok(())
    }

    /// Resolves the current fill for a draw whose user space maps to device space via `transform`.
    pub(crate) fn resolve_paint(&self, transform: Affine) -> Result<Option<ResolvedPaint>> {
        paint::resolve(
            &self.state.fill,
            self.state.opacity,
            self.state.quality,
            transform,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntRect;
    use crate::kurbo::Point;
    use crate::recording::RecordingTarget;

    fn assert_near(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs()) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn flip_maps_user_origin_to_device_top() {
        let ctx = GraphicsContext::new(RecordingTarget::new(100, 80), 80.0);
        assert_eq!(
            ctx.device_transform() * Point::new(0.0, 0.0),
            Point::new(0.0, 80.0)
        );
        assert_eq!(
            ctx.device_transform() * Point::new(10.0, 80.0),
            Point::new(10.0, 0.0)
        );
    }

    #[test]
    fn transform_then_inverse_is_identity() {
        let mut ctx = GraphicsContext::new(RecordingTarget::new(100, 100), 100.0);
        let t = Affine::new([2.0, 0.5, -0.25, 1.5, 13.0, -7.0]);
        ctx.add_transform(t);
        ctx.add_transform(t.inverse());
        assert_near(ctx.transform(), Affine::IDENTITY);
        assert_eq!(ctx.clip_bounds(), IntRect::new(0, 0, 100, 100));
    }

    #[test]
    fn added_transforms_apply_innermost_first() {
        let mut ctx = GraphicsContext::new(RecordingTarget::new(100, 100), 100.0);
        ctx.set_origin(10, 0);
        ctx.add_transform(Affine::scale(2.0));
        assert_eq!(ctx.transform() * Point::new(1.0, 1.0), Point::new(12.0, 2.0));
    }

    #[test]
    fn non_finite_transform_is_ignored() {
        let mut ctx = GraphicsContext::new(RecordingTarget::new(100, 100), 100.0);
        ctx.add_transform(Affine::scale(f64::NAN));
        assert_eq!(ctx.transform(), Affine::IDENTITY);
    }

    #[test]
    fn pixel_scale_follows_transform() {
        let mut ctx = GraphicsContext::new(RecordingTarget::new(100, 100), 100.0);
        assert_eq!(ctx.physical_pixel_scale_factor(), 1.0);
        ctx.add_transform(Affine::scale(2.0));
        assert_eq!(ctx.physical_pixel_scale_factor(), 2.0);
        assert!(!ctx.is_vector_device());
    }

    #[test]
    fn opacity_is_clamped() {
        let mut ctx = GraphicsContext::new(RecordingTarget::new(10, 10), 10.0);
        ctx.set_opacity(1.5);
        assert_eq!(ctx.opacity(), 1.0);
        ctx.set_opacity(0.25);
        ctx.set_opacity(f32::NAN);
        assert_eq!(ctx.opacity(), 0.25);
    }
}
