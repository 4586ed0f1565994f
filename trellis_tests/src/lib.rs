// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Trellis integration tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message
)]

use anyhow::{anyhow, Context, Result};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use trellis::kurbo::Point;
use trellis::peniko::color::palette::css::WHITE;
use trellis::peniko::{Blob, Color, FontData, ImageAlphaType, ImageData, ImageFormat};
use trellis::GraphicsContext;
use trellis_cpu::PixmapTarget;

/// The font used by every text test.
pub const DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

pub struct TestParams {
    pub width: u32,
    pub height: u32,
    /// Color the surface is cleared to before drawing; transparent when `None`.
    pub base_color: Option<Color>,
    pub anti_alias: bool,
}

impl TestParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            base_color: Some(WHITE),
            anti_alias: true,
        }
    }
}

/// Draws through a context whose user space matches pixmap rows and returns
/// the finished target.
pub fn render(
    params: &TestParams,
    draw: impl FnOnce(&mut GraphicsContext<PixmapTarget>) -> trellis::Result<()>,
) -> Result<PixmapTarget> {
    let mut target =
        PixmapTarget::new(params.width, params.height)?.with_anti_alias(params.anti_alias);
    if let Some(color) = params.base_color {
        target.clear(color);
    }
    let mut ctx = GraphicsContext::new(target, params.height as f32);
    draw(&mut ctx).context("drawing failed")?;
    Ok(ctx.finish()?)
}

/// The premultiplied RGBA value at `(x, y)`, in rows from the top.
pub fn pixel(target: &PixmapTarget, x: u32, y: u32) -> [u8; 4] {
    target
        .pixel(x, y)
        .unwrap_or_else(|| panic!("({x}, {y}) is outside the surface"))
}

/// The 8-bit premultiplied RGBA value of `color`.
pub fn rgba8(color: Color) -> [u8; 4] {
    color.premultiply().to_rgba8().to_u8_array()
}

/// Number of pixels whose value equals `value`.
pub fn count_pixels(target: &PixmapTarget, value: [u8; 4]) -> usize {
    target
        .pixmap()
        .data()
        .chunks_exact(4)
        .filter(|pixel| pixel[..] == value[..])
        .count()
}

/// Whether every channel of `a` is within `tolerance` of the same channel of `b`.
pub fn close_to(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b).all(|(&x, y)| x.abs_diff(y) <= tolerance)
}

pub fn dejavu_sans() -> FontData {
    FontData::new(Blob::from(DEJAVU_SANS.to_vec()), 0)
}

/// Maps `text` to glyph ids and pen positions along a baseline at `origin`,
/// for a font of `size` pixels.
pub fn shape(
    font: &FontData,
    text: &str,
    size: f32,
    origin: Point,
) -> Result<(Vec<u32>, Vec<Point>)> {
    let font_ref = FontRef::from_index(font.data.data(), font.index)
        .map_err(|err| anyhow!("couldn't read font: {err}"))?;
    let charmap = font_ref.charmap();
    let metrics = font_ref.glyph_metrics(
        skrifa::instance::Size::new(size),
        skrifa::instance::LocationRef::default(),
    );
    let mut pen_x = origin.x;
    let mut ids = Vec::new();
    let mut positions = Vec::new();
    for ch in text.chars() {
        let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
        ids.push(gid.to_u32());
        positions.push(Point::new(pen_x, origin.y));
        pen_x += f64::from(metrics.advance_width(gid).unwrap_or_default());
    }
    Ok((ids, positions))
}

/// A straight-alpha RGBA image filled with `color`.
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> ImageData {
    let data = color
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 4)
        .collect::<Vec<_>>();
    ImageData {
        data: Blob::from(data),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}
