// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::mem;

use tiny_skia::{
    BlendMode, FillRule, FilterQuality, LinearGradient, Mask, MaskType, Paint, PathBuilder,
    Pattern, Pixmap, PixmapPaint, RadialGradient, Shader, SpreadMode, Transform,
};
use trellis::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use trellis::paint::{GradientGeometry, GradientStop};
use trellis::peniko::{
    Blob, Color, Fill, FontData, ImageAlphaType, ImageData, ImageFormat, ImageQuality,
};
use trellis::{ClipRegion, ClipShape, Error, Glyph, IntRect, RenderTarget, ResolvedPaint, Result};

use crate::convert;
use crate::glyph::GlyphCache;
use crate::image::{mul_u8, to_pixmap};

/// A [`RenderTarget`] which rasterizes into a tiny-skia [`Pixmap`].
///
/// Device space has its origin at the bottom-left corner of the pixmap, so
/// the target flips every draw back into pixmap rows.
#[derive(Debug)]
pub struct PixmapTarget {
    /// The surface currently drawn into; a layer surface while layers are open.
    pixmap: Pixmap,
    layers: Vec<Layer>,
    clip: Clip,
    /// Maps device space to pixmap rows.
    base: Affine,
    anti_alias: bool,
    glyphs: GlyphCache,
}

#[derive(Debug)]
struct Layer {
    /// The surface the layer composites onto when popped.
    parent: Pixmap,
    opacity: f32,
}

#[derive(Debug)]
enum Clip {
    Unclipped,
    Mask(Mask),
    Empty,
}

impl Clip {
    fn mask(&self) -> Option<&Mask> {
        match self {
            Self::Mask(mask) => Some(mask),
            Self::Unclipped | Self::Empty => None,
        }
    }
}

/// A paint source ready to hand out tiny-skia shaders.
enum Source {
    Shader(Shader<'static>),
    Pattern {
        pixmap: Pixmap,
        quality: FilterQuality,
        opacity: f32,
        transform: Transform,
    },
}

impl Source {
    fn shader(&self) -> Shader<'_> {
        match self {
            Self::Shader(shader) => shader.clone(),
            Self::Pattern {
                pixmap,
                quality,
                opacity,
                transform,
            } => Pattern::new(
                pixmap.as_ref(),
                SpreadMode::Repeat,
                *quality,
                *opacity,
                *transform,
            ),
        }
    }
}

impl PixmapTarget {
    /// Creates a transparent `width` by `height` target.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(Error::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            layers: Vec::new(),
            clip: Clip::Unclipped,
            base: Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, f64::from(height)]),
            anti_alias: true,
            glyphs: GlyphCache::default(),
        })
    }

    /// Builder method for enabling or disabling anti-aliasing.
    #[must_use]
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Width of the surface in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height of the surface in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The bottom-most surface, which open layers will eventually composite onto.
    pub fn pixmap(&self) -> &Pixmap {
        self.layers
            .first()
            .map_or(&self.pixmap, |layer| &layer.parent)
    }

    fn pixmap_mut(&mut self) -> &mut Pixmap {
        match self.layers.first_mut() {
            Some(layer) => &mut layer.parent,
            None => &mut self.pixmap,
        }
    }

    /// Fills the whole surface with `color`, ignoring the clip.
    pub fn clear(&mut self, color: Color) {
        self.pixmap_mut().fill(convert::color(color));
    }

    /// The premultiplied RGBA value of the pixel in column `x` and row `y`,
    /// counting rows from the top.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixel = self.pixmap().pixel(x, y)?;
        Some([pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()])
    }

    /// Copies the pixels of `area`, in pixmap rows, into a new image.
    ///
    /// Returns `None` when `area` doesn't overlap the surface.
    pub fn snapshot(&self, area: IntRect) -> Option<ImageData> {
        let pixmap = self.pixmap();
        let surface = IntRect::new(0, 0, pixmap.width() as i32, pixmap.height() as i32);
        let area = area.intersect(surface);
        if area.is_empty() {
            return None;
        }
        let (width, height) = (area.width() as u32, area.height() as u32);
        let rect = tiny_skia::IntRect::from_xywh(area.x0, area.y0, width, height)?;
        let copy = pixmap.clone_rect(rect)?;
        Some(ImageData {
            data: Blob::from(copy.take()),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::AlphaPremultiplied,
            width,
            height,
        })
    }

    /// Consumes the target, returning straight-alpha RGBA rows from the top.
    pub fn into_rgba8(mut self) -> Vec<u8> {
        let pixmap = if self.layers.is_empty() {
            self.pixmap
        } else {
            self.layers.swap_remove(0).parent
        };
        pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect()
    }

    /// Maps a device-space transform to pixmap rows.
    fn to_pixmap_space(&self, transform: Affine) -> Transform {
        convert::transform(self.base * transform)
    }

    fn make_paint<'a>(&self, source: &'a Source, blend_mode: BlendMode) -> Paint<'a> {
        Paint {
            shader: source.shader(),
            blend_mode,
            anti_alias: self.anti_alias,
            ..Default::default()
        }
    }

    fn fill_converted(
        &mut self,
        path: &tiny_skia::Path,
        fill_rule: FillRule,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()> {
        let Some(source) = source(paint, transform)? else {
            return Ok(());
        };
        let paint = self.make_paint(&source, BlendMode::SourceOver);
        let transform = self.to_pixmap_space(transform);
        self.pixmap
            .fill_path(path, &paint, fill_rule, transform, self.clip.mask());
        Ok(())
    }

    fn build_clip(&self, clip: &ClipRegion) -> Result<Clip> {
        if clip.is_empty() {
            return Ok(Clip::Empty);
        }
        let bounds = self.device_bounds();
        if clip.shapes().is_empty() && clip.rects().len() == 1 && clip.bounds().contains_rect(bounds)
        {
            return Ok(Clip::Unclipped);
        }

        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut mask = Mask::new(width, height).ok_or(Error::MaskAllocation)?;
        let base = convert::transform(self.base);
        let mut rects = PathBuilder::new();
        for rect in clip.rects().iter() {
            if let Some(rect) = tiny_skia::Rect::from_ltrb(
                rect.x0 as f32,
                rect.y0 as f32,
                rect.x1 as f32,
                rect.y1 as f32,
            ) {
                rects.push_rect(rect);
            }
        }
        let Some(rects) = rects.finish() else {
            return Ok(Clip::Empty);
        };
        mask.fill_path(&rects, FillRule::Winding, self.anti_alias, base);

        for shape in clip.shapes() {
            match shape {
                ClipShape::Path { path, fill_rule } => match convert::path(path) {
                    Some(path) => mask.intersect_path(
                        &path,
                        convert::fill_rule(*fill_rule),
                        self.anti_alias,
                        base,
                    ),
                    None => return Ok(Clip::Empty),
                },
                ClipShape::ImageAlpha { image, transform } => {
                    let image = to_pixmap(image)?;
                    let mut coverage = Pixmap::new(width, height).ok_or(Error::MaskAllocation)?;
                    let paint = PixmapPaint {
                        quality: FilterQuality::Bilinear,
                        ..Default::default()
                    };
                    coverage.draw_pixmap(
                        0,
                        0,
                        image.as_ref(),
                        &paint,
                        self.to_pixmap_space(*transform),
                        None,
                    );
                    let alpha = Mask::from_pixmap(coverage.as_ref(), MaskType::Alpha);
                    for (a, b) in mask.data_mut().iter_mut().zip(alpha.data()) {
                        *a = mul_u8(*a, *b);
                    }
                }
            }
        }
        Ok(Clip::Mask(mask))
    }
}

/// Builds the shader source for `paint` when drawing geometry mapped by `transform`.
///
/// tiny-skia maps shaders by the geometry transform, so the paint transform is
/// made relative to it. Returns `None` when the geometry collapses.
fn source(paint: &ResolvedPaint, transform: Affine) -> Result<Option<Source>> {
    let relative = |paint_transform: Affine| {
        if transform.determinant().abs() <= f64::EPSILON {
            None
        } else {
            Some(convert::transform(transform.inverse() * paint_transform))
        }
    };
    match paint {
        ResolvedPaint::Solid(color) => Ok(Some(Source::Shader(Shader::SolidColor(
            convert::color(*color),
        )))),
        ResolvedPaint::Gradient {
            geometry,
            stops,
            extend,
            transform: paint_transform,
        } => {
            let Some(local) = relative(*paint_transform) else {
                return Ok(None);
            };
            let stops: Vec<_> = stops.iter().map(gradient_stop).collect();
            let mode = convert::spread_mode(*extend);
            let shader = match *geometry {
                GradientGeometry::Linear { start, end } => {
                    LinearGradient::new(point(start), point(end), stops, mode, local)
                }
                GradientGeometry::Radial {
                    start_center,
                    end_center,
                    end_radius,
                    ..
                } => RadialGradient::new(
                    point(start_center),
                    point(end_center),
                    end_radius,
                    stops,
                    mode,
                    local,
                ),
            };
            shader
                .map(|shader| Some(Source::Shader(shader)))
                .ok_or(Error::ShaderCreation)
        }
        ResolvedPaint::Pattern {
            image,
            transform: paint_transform,
            opacity,
            quality,
        } => {
            let Some(local) = relative(*paint_transform) else {
                return Ok(None);
            };
            Ok(Some(Source::Pattern {
                pixmap: to_pixmap(image)?,
                quality: convert::filter_quality(*quality),
                opacity: opacity.clamp(0.0, 1.0),
                transform: local,
            }))
        }
    }
}

fn point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

fn gradient_stop(stop: &GradientStop) -> tiny_skia::GradientStop {
    tiny_skia::GradientStop::new(stop.offset, convert::color(stop.color))
}

impl RenderTarget for PixmapTarget {
    fn device_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.pixmap.width()),
            f64::from(self.pixmap.height()),
        )
    }

    fn set_clip(&mut self, clip: &ClipRegion) -> Result<()> {
        self.clip = self.build_clip(clip)?;
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        fill_rule: Fill,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()> {
        if matches!(self.clip, Clip::Empty) {
            return Ok(());
        }
        let Some(path) = convert::path(path) else {
            return Ok(());
        };
        self.fill_converted(&path, convert::fill_rule(fill_rule), transform, paint)
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        transform: Affine,
        paint: &ResolvedPaint,
        replace: bool,
    ) -> Result<()> {
        if matches!(self.clip, Clip::Empty) {
            return Ok(());
        }
        let rect = rect.abs();
        let Some(rect) =
            tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
        else {
            return Ok(());
        };
        let Some(source) = source(paint, transform)? else {
            return Ok(());
        };
        let blend_mode = if replace {
            BlendMode::Source
        } else {
            BlendMode::SourceOver
        };
        let paint = self.make_paint(&source, blend_mode);
        let transform = self.to_pixmap_space(transform);
        self.pixmap
            .fill_rect(rect, &paint, transform, self.clip.mask());
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        transform: Affine,
        paint: &ResolvedPaint,
    ) -> Result<()> {
        if matches!(self.clip, Clip::Empty) {
            return Ok(());
        }
        let Some(path) = convert::path(path) else {
            return Ok(());
        };
        let Some(source) = source(paint, transform)? else {
            return Ok(());
        };
        let paint = self.make_paint(&source, BlendMode::SourceOver);
        let stroke = convert::stroke(stroke);
        let transform = self.to_pixmap_space(transform);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, self.clip.mask());
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        transform: Affine,
        opacity: f32,
        quality: ImageQuality,
    ) -> Result<()> {
        if matches!(self.clip, Clip::Empty) {
            return Ok(());
        }
        let image = to_pixmap(image)?;
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            blend_mode: BlendMode::SourceOver,
            quality: convert::filter_quality(quality),
        };
        let transform = self.to_pixmap_space(transform);
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, self.clip.mask());
        Ok(())
    }

    fn fill_glyphs(
        &mut self,
        font: &FontData,
        glyphs: &[Glyph],
        paint: &ResolvedPaint,
    ) -> Result<()> {
        if matches!(self.clip, Clip::Empty) {
            return Ok(());
        }
        let mut outlines = BezPath::new();
        self.glyphs.append_run(font, glyphs, &mut outlines)?;
        let Some(path) = convert::path(&outlines) else {
            return Ok(());
        };
        self.fill_converted(&path, FillRule::Winding, Affine::IDENTITY, paint)
    }

    fn push_layer(&mut self, opacity: f32) -> Result<()> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let surface = Pixmap::new(width, height).ok_or(Error::LayerAllocation { width, height })?;
        let parent = mem::replace(&mut self.pixmap, surface);
        self.layers.push(Layer { parent, opacity });
        log::trace!("pushed layer {} at opacity {opacity}", self.layers.len());
        Ok(())
    }

    fn pop_layer(&mut self) -> Result<()> {
        let Some(layer) = self.layers.pop() else {
            log::warn!("pop_layer called without an open layer");
            return Ok(());
        };
        let content = mem::replace(&mut self.pixmap, layer.parent);
        let paint = PixmapPaint {
            opacity: layer.opacity.clamp(0.0, 1.0),
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, content.as_ref(), &paint, Transform::identity(), None);
        Ok(())
    }
}
