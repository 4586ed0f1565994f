// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transparency layers.

use crate::state::ScopeKind;
use crate::target::RenderTarget;
use crate::{GraphicsContext, Result};

impl<T: RenderTarget> GraphicsContext<T> {
    /// Starts compositing subsequent draws into an isolated group.
    ///
    /// The group is blended onto the content beneath it with `opacity` by
    /// the matching [`end_transparency_layer`](Self::end_transparency_layer).
    /// Like [`save_state`](Self::save_state), this also opens a state scope,
    /// which the matching end closes.
    ///
    /// If the target can't allocate the layer, the error is returned and no
    /// layer is begun; the caller must then skip the matching end.
    pub fn begin_transparency_layer(&mut self, opacity: f32) -> Result<()> {
        let opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let pushed = !self.state.clip.is_empty();
        if pushed {
            self.sync_clip()?;
            self.target.push_layer(opacity)?;
            log::trace!("began transparency layer with opacity {opacity}");
        }
        self.stack
            .push(self.state.clone(), ScopeKind::Layer { pushed });
        Ok(())
    }

    /// Composites the innermost transparency layer and restores the state
    /// saved when it began.
    ///
    /// Ending a layer while a save scope opened inside it is still open is a
    /// programming error, as is ending with no layer open. Debug builds
    /// panic. Release builds restore the intervening scopes first, or do
    /// nothing when no layer is open.
    pub fn end_transparency_layer(&mut self) -> Result<()> {
        let top = self.stack.top_kind();
        debug_assert!(
            self.stack.layer_depth() > 0,
            "end_transparency_layer without an open transparency layer"
        );
        debug_assert!(
            !matches!(top, Some(ScopeKind::Save)),
            "end_transparency_layer while a save scope inside the layer is still open"
        );
        if self.stack.layer_depth() == 0 {
            log::warn!("end_transparency_layer without an open transparency layer");
            return Ok(());
        }
        loop {
            match self.stack.top_kind() {
                Some(ScopeKind::Layer { .. }) => return self.pop_scope(),
                Some(ScopeKind::Save) => {
                    log::warn!("end_transparency_layer is restoring a save scope left open");
                    self.pop_scope()?;
                }
                None => return Ok(()),
            }
        }
    }

    /// Number of transparency layers currently open.
    pub fn layer_depth(&self) -> usize {
        self.stack.layer_depth()
    }
}
