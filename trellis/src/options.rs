// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::paint::FillType;
use crate::peniko::ImageQuality;
use crate::state::Font;

pub(crate) const DEFAULT_TOLERANCE: f64 = 0.1;

/// Options which are set at context creation time.
#[derive(Clone, Debug)]
pub struct ContextOptions {
    /// Width used by [`draw_line`](crate::GraphicsContext::draw_line).
    pub line_width: f64,
    /// Accuracy used when converting ellipses and rounded rectangles to paths.
    pub tolerance: f64,
    /// Interpolation quality at the bottom of the state stack.
    pub quality: ImageQuality,
    /// Fill at the bottom of the state stack.
    pub fill: FillType,
    /// Font at the bottom of the state stack.
    pub font: Font,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            tolerance: DEFAULT_TOLERANCE,
            quality: ImageQuality::Medium,
            fill: FillType::default(),
            font: Font::default(),
        }
    }
}
