// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state snapshots and the save/restore stack.

use crate::clip::ClipRegion;
use crate::kurbo::Affine;
use crate::paint::FillType;
use crate::peniko::{FontData, ImageQuality};
use crate::target::RenderTarget;
use crate::{GraphicsContext, Result};

/// The font used by glyph runs.
///
/// Shaping and layout happen elsewhere; this only describes how glyph
/// outlines are scaled and slanted.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Font file to take glyph outlines from. Glyph runs are skipped without one.
    pub typeface: Option<FontData>,
    /// Em size in user-space units.
    pub size: f32,
    /// Horizontal stretch applied on top of `size`.
    pub horizontal_scale: f32,
    /// Synthetic slant, as the horizontal shift per unit of height.
    pub skew: f32,
}

impl Font {
    /// A font drawing `typeface` at `size`.
    pub fn new(typeface: FontData, size: f32) -> Self {
        Self {
            typeface: Some(typeface),
            ..Self::default()
        }
        .with_size(size)
    }

    /// Builder method for setting the em size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Builder method for setting the horizontal stretch.
    #[must_use]
    pub fn with_horizontal_scale(mut self, horizontal_scale: f32) -> Self {
        self.horizontal_scale = horizontal_scale;
        self
    }

    /// Builder method for setting the synthetic slant.
    #[must_use]
    pub fn with_skew(mut self, skew: f32) -> Self {
        self.skew = skew;
        self
    }

    /// Maps em space onto user space, or `None` when the font metrics are unusable.
    pub(crate) fn em_transform(&self) -> Option<Affine> {
        let size = f64::from(self.size);
        let horizontal_scale = f64::from(self.horizontal_scale);
        let skew = f64::from(self.skew);
        if !(size.is_finite() && horizontal_scale.is_finite() && skew.is_finite()) {
            return None;
        }
        if size <= 0.0 || horizontal_scale <= 0.0 {
            return None;
        }
        Some(Affine::scale_non_uniform(size * horizontal_scale, size) * Affine::skew(-skew, 0.0))
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            typeface: None,
            size: 14.0,
            horizontal_scale: 1.0,
            skew: 0.0,
        }
    }
}

/// Everything a save/restore scope captures.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Maps user space into the unflipped intermediate space.
    pub transform: Affine,
    /// Region eligible for drawing, in device space.
    pub clip: ClipRegion,
    /// Paint used by fill operations.
    pub fill: FillType,
    /// Opacity in `0..=1` applied to fills and images.
    pub opacity: f32,
    /// Resampling quality for images.
    pub quality: ImageQuality,
    /// Font used by glyph runs.
    pub font: Font,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// Opened by `save_state`.
    Save,
    /// Opened by `begin_transparency_layer`. `pushed` is false when the
    /// target was never asked for a layer because the clip was empty.
    Layer { pushed: bool },
}

#[derive(Debug)]
struct SavedState {
    state: RenderState,
    kind: ScopeKind,
}

#[derive(Debug, Default)]
pub(crate) struct StateStack {
    saved: Vec<SavedState>,
}

impl StateStack {
    pub(crate) fn push(&mut self, state: RenderState, kind: ScopeKind) {
        self.saved.push(SavedState { state, kind });
    }

    pub(crate) fn pop(&mut self) -> Option<(RenderState, ScopeKind)> {
        self.saved.pop().map(|saved| (saved.state, saved.kind))
    }

    pub(crate) fn top_kind(&self) -> Option<ScopeKind> {
        self.saved.last().map(|saved| saved.kind)
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Whether any scope opened by `save_state` is still open.
    pub(crate) fn has_save(&self) -> bool {
        self.saved.iter().any(|saved| saved.kind == ScopeKind::Save)
    }

    pub(crate) fn layer_depth(&self) -> usize {
        self.saved
            .iter()
            .filter(|saved| matches!(saved.kind, ScopeKind::Layer { .. }))
            .count()
    }
}

impl<T: RenderTarget> GraphicsContext<T> {
    /// Pushes a copy of the current state.
    pub fn save_state(&mut self) {
        self.stack.push(self.state.clone(), ScopeKind::Save);
    }

    /// Pops the most recently saved state and makes it current.
    ///
    /// Calling this without a matching [`save_state`](Self::save_state), or
    /// while a transparency layer begun since that save is still open, is a
    /// programming error. Debug builds panic. Release builds ignore an
    /// unmatched restore, and end any open layers before restoring.
    pub fn restore_state(&mut self) -> Result<()> {
        let top = self.stack.top_kind();
        debug_assert!(
            self.stack.has_save(),
            "restore_state without a matching save_state"
        );
        debug_assert!(
            !matches!(top, Some(ScopeKind::Layer { .. })),
            "restore_state while a transparency layer is still open"
        );
        if !self.stack.has_save() {
            log::warn!("restore_state without a matching save_state");
            return Ok(());
        }
        loop {
            match self.stack.top_kind() {
                Some(ScopeKind::Save) => return self.pop_scope(),
                Some(ScopeKind::Layer { .. }) => {
                    log::warn!("restore_state is ending a transparency layer left open");
                    self.pop_scope()?;
                }
                None => {
                    log::warn!("restore_state without a matching save_state");
                    return Ok(());
                }
            }
        }
    }

    /// Number of open save scopes and transparency layers.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Pops the top scope, compositing it first if it is a layer.
    pub(crate) fn pop_scope(&mut self) -> Result<()> {
        let Some((state, kind)) = self.stack.pop() else {
            return Ok(());
        };
        self.state = state;
        self.clip_changed();
        if kind == (ScopeKind::Layer { pushed: true }) {
            log::trace!("compositing transparency layer");
            self.target.pop_layer()?;
        }
        Ok(())
    }

    /// Pops scopes until only `depth` remain.
    pub(crate) fn unwind_to(&mut self, depth: usize) -> Result<()> {
        while self.stack.depth() > depth {
            self.pop_scope()?;
        }
        Ok(())
    }
}
