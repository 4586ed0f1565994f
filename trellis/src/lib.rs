// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis is an immediate-mode 2D graphics context.
//!
//! A [`GraphicsContext`] tracks the drawing state a caller manipulates
//! (transform, clip region, fill, opacity, interpolation quality and font)
//! on a stack of save/restore scopes, and turns every drawing call into
//! device-space commands for a [`RenderTarget`].
//!
//! Callers work in a y-down coordinate system. Targets receive y-up device
//! coordinates: a vertical flip by the height given to
//! [`GraphicsContext::new`] is folded into every transform sent to the target.
//!
//! Transparency layers composite everything drawn between
//! [`begin_transparency_layer`](GraphicsContext::begin_transparency_layer) and
//! [`end_transparency_layer`](GraphicsContext::end_transparency_layer) as one
//! group, with a single opacity.
//!
//! ```
//! use trellis::kurbo::Rect;
//! use trellis::peniko::color::palette::css::RED;
//! use trellis::{GraphicsContext, IntRect, RecordingTarget};
//!
//! # fn main() -> trellis::Result<()> {
//! let mut ctx = GraphicsContext::new(RecordingTarget::new(100, 100), 100.0);
//! ctx.save_state();
//! ctx.clip_to_rectangle(IntRect::new(0, 0, 50, 50));
//! ctx.set_fill(RED);
//! ctx.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0))?;
//! ctx.restore_state()?;
//! let target = ctx.finish()?;
//! assert_eq!(target.draw_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! The `trellis_cpu` crate provides a target which rasterizes into a pixmap.

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![forbid(unsafe_code)]

pub use peniko;
pub use peniko::kurbo;

pub mod clip;
mod context;
mod draw;
mod error;
pub mod geometry;
mod layer;
mod options;
pub mod paint;
pub mod rect_list;
pub mod recording;
mod state;
pub mod target;

pub use clip::{ClipKind, ClipRegion, ClipShape};
pub use context::GraphicsContext;
pub use error::{Error, ErrorKind};
pub use geometry::{IntRect, Path};
pub use options::ContextOptions;
pub use paint::{FillType, GradientGeometry, GradientStop, ResolvedPaint};
pub use rect_list::RectList;
pub use recording::{RecordingTarget, TargetCommand};
pub use state::{Font, RenderState};
pub use target::{Glyph, RenderTarget};

/// A specialized `Result` type for graphics context operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
