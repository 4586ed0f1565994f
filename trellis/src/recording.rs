// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A render target which records what it is asked to do.

use crate::clip::ClipRegion;
use crate::kurbo::{Affine, BezPath, Rect, Stroke};
use crate::paint::ResolvedPaint;
use crate::peniko::{Fill, FontData, ImageData, ImageQuality};
use crate::target::{Glyph, RenderTarget};
use crate::{Error, Result};

/// A single call received by a [`RecordingTarget`].
#[derive(Clone, Debug)]
pub enum TargetCommand {
    /// Replace the clip.
    SetClip(ClipRegion),
    /// Fill a path.
    FillPath {
        /// Outline, before `transform`.
        path: BezPath,
        /// Winding rule.
        fill_rule: Fill,
        /// Maps the outline to device space.
        transform: Affine,
        /// Resolved fill.
        paint: ResolvedPaint,
    },
    /// Fill a rectangle.
    FillRect {
        /// Rectangle, before `transform`.
        rect: Rect,
        /// Maps the rectangle to device space.
        transform: Affine,
        /// Resolved fill.
        paint: ResolvedPaint,
        /// Whether existing pixels are replaced rather than blended.
        replace: bool,
    },
    /// Stroke a path.
    StrokePath {
        /// Outline, before `transform`.
        path: BezPath,
        /// Stroke style.
        stroke: Stroke,
        /// Maps the outline to device space.
        transform: Affine,
        /// Resolved fill.
        paint: ResolvedPaint,
    },
    /// Draw an image once.
    DrawImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Maps image pixels to device space.
        transform: Affine,
        /// Opacity applied to the image.
        opacity: f32,
        /// Resampling quality.
        quality: ImageQuality,
    },
    /// Fill a run of glyph outlines.
    FillGlyphs {
        /// Font the outlines come from.
        font: FontData,
        /// Glyphs placed in device space.
        glyphs: Vec<Glyph>,
        /// Resolved fill.
        paint: ResolvedPaint,
    },
    /// Begin an isolated group.
    PushLayer {
        /// Opacity used when the group is composited.
        opacity: f32,
    },
    /// Composite the innermost group.
    PopLayer,
}

impl TargetCommand {
    /// The name of the target method that produced this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetClip(_) => "set_clip",
            Self::FillPath { .. } => "fill_path",
            Self::FillRect { .. } => "fill_rect",
            Self::StrokePath { .. } => "stroke_path",
            Self::DrawImage { .. } => "draw_image",
            Self::FillGlyphs { .. } => "fill_glyphs",
            Self::PushLayer { .. } => "push_layer",
            Self::PopLayer => "pop_layer",
        }
    }

    /// Whether this command produces output, as opposed to changing target state.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::FillPath { .. }
                | Self::FillRect { .. }
                | Self::StrokePath { .. }
                | Self::DrawImage { .. }
                | Self::FillGlyphs { .. }
        )
    }
}

/// A target that keeps a log of every call instead of drawing.
#[derive(Debug)]
pub struct RecordingTarget {
    bounds: Rect,
    commands: Vec<TargetCommand>,
    open_layers: usize,
    refuse_layers: bool,
}

impl RecordingTarget {
    /// Creates a target with a `width` by `height` device area.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            commands: Vec::new(),
            open_layers: 0,
            refuse_layers: false,
        }
    }

    /// Builder method making every layer allocation fail.
    #[must_use]
    pub fn refusing_layers(mut self) -> Self {
        self.refuse_layers = true;
        self
    }

    /// The recorded commands, oldest first.
    pub fn commands(&self) -> &[TargetCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<TargetCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Number of recorded commands which produce output.
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|cmd| cmd.is_draw()).count()
    }

    /// Number of layers pushed and not yet popped.
    pub fn open_layers(&self) -> usize {
        self.open_layers
    }

    /// Device-space bounds of every clip received, oldest first.
    pub fn clip_bounds_history(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                TargetCommand::SetClip(clip) => Some(clip.bounds()),
                _ => None,
            })
            .collect()
    }
}

impl RenderTarget for RecordingTarget {
    fn device_bounds(&self) -> Rect {
        self.bounds
    }

    fn set_clip(&mut self, clip: &ClipRegion) -> Result<()> {
        self.commands.push(TargetCommand::SetClip(clip.clone()));
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        fill_rule: Fill,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()> {
        self.commands.push(TargetCommand::FillPath {
            path: path.clone(),
            fill_rule,
            transform,
            paint: paint.clone(),
        });
        Ok(())
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        transform: Affine,
        paint: &ResolvedPaint,
        replace: bool,
    ) -> Result<()> {
        self.commands.push(TargetCommand::FillRect {
            rect,
            transform,
            paint: paint.clone(),
            replace,
        });
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()> {
        self.commands.push(TargetCommand::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
            transform,
            paint: paint.clone(),
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        transform: Affine,
        opacity: f32,
        quality: ImageQuality,
    ) -> Result<()> {
        self.commands.push(TargetCommand::DrawImage {
            width: image.width,
            height: image.height,
            transform,
            opacity,
            quality,
        });
        Ok(())
    }

    fn fill_glyphs(
        &mut self,
        font: &FontData,
        glyphs: &[Glyph],
        paint: &ResolvedPaint,
    ) -> Result<()> {
        self.commands.push(TargetCommand::FillGlyphs {
            font: font.clone(),
            glyphs: glyphs.to_vec(),
            paint: paint.clone(),
        });
        Ok(())
    }

    fn push_layer(&mut self, opacity: f32) -> Result<()> {
        if self.refuse_layers {
            let (width, height) = (self.bounds.width(), self.bounds.height());
            return Err(Error::LayerAllocation {
                width: width as u32,
                height: height as u32,
            });
        }
        self.open_layers += 1;
        self.commands.push(TargetCommand::PushLayer { opacity });
        Ok(())
    }

    fn pop_layer(&mut self) -> Result<()> {
        self.open_layers = self.open_layers.saturating_sub(1);
        self.commands.push(TargetCommand::PopLayer);
        Ok(())
    }
}
