// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU render target for the [Trellis](trellis) graphics context, built on
//! [tiny-skia](tiny_skia).
//!
//! [`PixmapTarget`] rasterizes everything a [`GraphicsContext`](trellis::GraphicsContext)
//! emits into an RGBA pixmap. Clip regions become 8-bit coverage masks,
//! transparency layers become offscreen pixmaps, and glyph outlines are read
//! with skrifa.
//!
//! ```
//! use trellis::kurbo::Rect;
//! use trellis::peniko::color::palette::css::RED;
//! use trellis::GraphicsContext;
//! use trellis_cpu::PixmapTarget;
//!
//! # fn main() -> trellis::Result<()> {
//! let mut ctx = GraphicsContext::new(PixmapTarget::new(16, 16)?, 16.0);
//! ctx.set_fill(RED);
//! ctx.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0))?;
//! let target = ctx.finish()?;
//! assert_eq!(target.pixel(0, 0), Some([255, 0, 0, 255]));
//! assert_eq!(target.pixel(12, 12), Some([0, 0, 0, 0]));
//! # Ok(())
//! # }
//! ```

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![forbid(unsafe_code)]

mod convert;
mod glyph;
mod image;
mod pixmap_target;

pub use pixmap_target::PixmapTarget;
pub use tiny_skia;
