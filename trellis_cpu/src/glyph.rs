// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph outline extraction and caching.

use std::collections::HashMap;

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider, OutlineGlyphCollection};
use trellis::kurbo::BezPath;
use trellis::peniko::FontData;
use trellis::{Error, Glyph, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    blob: u64,
    index: u32,
    glyph: u32,
}

/// Maximum number of glyph runs an unused outline is retained for.
const MAX_ENTRY_AGE: u64 = 64;
/// Maximum number of glyph runs between prunes.
const PRUNE_FREQUENCY: u64 = 64;
/// Always prune once more outlines than this are cached.
const CACHED_COUNT_THRESHOLD: usize = 256;

#[derive(Debug)]
struct CachedOutline {
    /// `None` for glyphs with no outline, such as spaces.
    outline: Option<BezPath>,
    /// Serial of the last run which used this entry.
    serial: u64,
}

/// Unhinted glyph outlines at 1 ppem, keyed by font and glyph id.
///
/// Outlines not used by any of the last [`MAX_ENTRY_AGE`] runs are dropped.
#[derive(Debug, Default)]
pub(crate) struct GlyphCache {
    outlines: HashMap<GlyphKey, CachedOutline>,
    serial: u64,
    last_prune_serial: u64,
}

impl GlyphCache {
    /// Appends the outlines of `glyphs`, each mapped by its transform, to `out`.
    pub(crate) fn append_run(
        &mut self,
        font: &FontData,
        glyphs: &[Glyph],
        out: &mut BezPath,
    ) -> Result<()> {
        let font_ref =
            FontRef::from_index(font.data.data(), font.index).map_err(|_| Error::InvalidFont)?;
        let collection = font_ref.outline_glyphs();
        let blob = font.data.id();
        let serial = self.serial;
        for glyph in glyphs {
            let key = GlyphKey {
                blob,
                index: font.index,
                glyph: glyph.id,
            };
            let entry = self.outlines.entry(key).or_insert_with(|| CachedOutline {
                outline: load_outline(&collection, glyph.id),
                serial,
            });
            entry.serial = serial;
            if let Some(outline) = &entry.outline {
                out.extend(outline.elements().iter().map(|&el| glyph.transform * el));
            }
        }
        self.maintain();
        Ok(())
    }

    /// Ends a run, dropping outlines which have gone unused for too long.
    fn maintain(&mut self) {
        let serial = self.serial;
        self.serial += 1;
        if serial - self.last_prune_serial < PRUNE_FREQUENCY
            && self.outlines.len() < CACHED_COUNT_THRESHOLD
        {
            return;
        }
        self.last_prune_serial = serial;
        let before = self.outlines.len();
        self.outlines
            .retain(|_, entry| serial - entry.serial <= MAX_ENTRY_AGE);
        log::trace!(
            "pruned {} glyph outlines",
            before - self.outlines.len()
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.outlines.len()
    }
}

fn load_outline(collection: &OutlineGlyphCollection<'_>, glyph_id: u32) -> Option<BezPath> {
    let glyph = collection.get(GlyphId::new(glyph_id))?;
    let mut path = OutlinePath(BezPath::new());
    let settings = DrawSettings::unhinted(Size::new(1.0), LocationRef::default());
    if let Err(err) = glyph.draw(settings, &mut path) {
        log::debug!("couldn't draw outline of glyph {glyph_id}: {err}");
        return None;
    }
    (!path.0.elements().is_empty()).then_some(path.0)
}

struct OutlinePath(BezPath);

// Font units grow upwards, em space grows downwards.
impl OutlinePen for OutlinePath {
    #[inline]
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((x, -y));
    }

    #[inline]
    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((x, -y));
    }

    #[inline]
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to((cx0, -cy0), (cx1, -cy1), (x, -y));
    }

    #[inline]
    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.0.quad_to((cx, -cy), (x, -y));
    }

    #[inline]
    fn close(&mut self) {
        self.0.close_path();
    }
}
