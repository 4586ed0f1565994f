// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill descriptors and their resolution into paints a target can consume.

use smallvec::SmallVec;

use crate::kurbo::{Affine, Point};
use crate::peniko::color::palette::css::BLACK;
use crate::peniko::color::Srgb;
use crate::peniko::{Color, Extend, Gradient, GradientKind, ImageData, ImageQuality};
use crate::{Error, Result};

/// The paint style used by fill operations.
///
/// Setting a new fill replaces the previous one wholesale.
#[derive(Clone, Debug, PartialEq)]
pub enum FillType {
    /// A single color.
    Solid(Color),
    /// A linear or radial gradient.
    Gradient {
        /// Gradient geometry and color stops, in fill space.
        gradient: Gradient,
        /// Maps fill space into the user space of the draw.
        transform: Affine,
    },
    /// An image repeated in both directions to cover whatever is filled.
    Image {
        /// The tile.
        image: ImageData,
        /// Maps image pixels into the user space of the draw.
        transform: Affine,
    },
}

impl FillType {
    /// A solid color fill.
    pub fn solid(color: Color) -> Self {
        Self::Solid(color)
    }

    /// A gradient fill with an identity transform.
    pub fn gradient(gradient: Gradient) -> Self {
        Self::Gradient {
            gradient,
            transform: Affine::IDENTITY,
        }
    }

    /// A tiled image fill anchored at `transform`.
    pub fn tiled_image(image: ImageData, transform: Affine) -> Self {
        Self::Image { image, transform }
    }

    /// Builder method for replacing the fill transform.
    ///
    /// Solid fills have no transform and are returned unchanged.
    #[must_use]
    pub fn with_transform(mut self, new_transform: Affine) -> Self {
        match &mut self {
            Self::Solid(_) => {}
            Self::Gradient { transform, .. } | Self::Image { transform, .. } => {
                *transform = new_transform;
            }
        }
        self
    }
}

impl Default for FillType {
    fn default() -> Self {
        Self::Solid(BLACK)
    }
}

impl From<Color> for FillType {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<Gradient> for FillType {
    fn from(gradient: Gradient) -> Self {
        Self::gradient(gradient)
    }
}

/// Geometry of a resolved gradient, in paint space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GradientGeometry {
    /// Colors vary along the line from `start` to `end`.
    Linear {
        /// Position of offset 0.
        start: Point,
        /// Position of offset 1.
        end: Point,
    },
    /// Colors vary between two circles.
    Radial {
        /// Center of the circle at offset 0.
        start_center: Point,
        /// Radius of the circle at offset 0.
        start_radius: f32,
        /// Center of the circle at offset 1.
        end_center: Point,
        /// Radius of the circle at offset 1.
        end_radius: f32,
    },
}

/// A color stop with its alpha already scaled by the context opacity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the ramp, in `0..=1`.
    pub offset: f32,
    /// Color at this position.
    pub color: Color,
}

/// A fill resolved against the opacity and transform in effect for one draw.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedPaint {
    /// A single color.
    Solid(Color),
    /// A gradient ramp.
    Gradient {
        /// Ramp geometry.
        geometry: GradientGeometry,
        /// At least two stops, sorted by offset; equal offsets form a hard step.
        stops: SmallVec<[GradientStop; 4]>,
        /// Behavior outside the `0..=1` range.
        extend: Extend,
        /// Maps paint space to device space.
        transform: Affine,
    },
    /// A repeating image.
    Pattern {
        /// The tile.
        image: ImageData,
        /// Maps image pixels to device space.
        transform: Affine,
        /// Opacity applied to every sample.
        opacity: f32,
        /// Sampling quality.
        quality: ImageQuality,
    },
}

/// Resolves `fill` for a draw whose user space maps to device space via `transform`.
///
/// Returns `Ok(None)` when the fill can't produce any coverage, for example a
/// gradient with no stops or a linear gradient whose end points coincide.
pub fn resolve(
    fill: &FillType,
    opacity: f32,
    quality: ImageQuality,
    transform: Affine,
) -> Result<Option<ResolvedPaint>> {
    match fill {
        FillType::Solid(color) => Ok(Some(ResolvedPaint::Solid(color.multiply_alpha(opacity)))),
        FillType::Gradient {
            gradient,
            transform: fill_transform,
        } => resolve_gradient(gradient, opacity, transform * *fill_transform),
        FillType::Image {
            image,
            transform: fill_transform,
        } => {
            if image.width == 0 || image.height == 0 {
                return Ok(None);
            }
            Ok(Some(ResolvedPaint::Pattern {
                image: image.clone(),
                transform: transform * *fill_transform,
                opacity,
                quality,
            }))
        }
    }
}

fn resolve_gradient(
    gradient: &Gradient,
    opacity: f32,
    transform: Affine,
) -> Result<Option<ResolvedPaint>> {
    let geometry = match gradient.kind {
        GradientKind::Linear(pos) => {
            if !pos.start.is_finite() || !pos.end.is_finite() || pos.start == pos.end {
                return Ok(None);
            }
            GradientGeometry::Linear {
                start: pos.start,
                end: pos.end,
            }
        }
        GradientKind::Radial(pos) => {
            let finite = pos.start_center.is_finite()
                && pos.end_center.is_finite()
                && pos.start_radius.is_finite()
                && pos.end_radius.is_finite();
            if !finite || pos.end_radius <= 0.0 {
                return Ok(None);
            }
            GradientGeometry::Radial {
                start_center: pos.start_center,
                start_radius: pos.start_radius.max(0.0),
                end_center: pos.end_center,
                end_radius: pos.end_radius,
            }
        }
        GradientKind::Sweep(_) => return Err(Error::UnsupportedGradient("sweep")),
    };

    let mut stops: SmallVec<[GradientStop; 4]> = gradient
        .stops
        .iter()
        .filter(|stop| stop.offset.is_finite())
        .map(|stop| GradientStop {
            offset: stop.offset.clamp(0.0, 1.0),
            color: stop
                .color
                .to_alpha_color::<Srgb>()
                .multiply_alpha(opacity),
        })
        .collect();
    // Stable, so stops sharing an offset keep their order and form a hard step.
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    match stops.len() {
        0 => Ok(None),
        1 => Ok(Some(ResolvedPaint::Solid(stops[0].color))),
        _ => Ok(Some(ResolvedPaint::Gradient {
            geometry,
            stops,
            extend: gradient.extend,
            transform,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peniko::color::palette::css::{BLUE, LIME, RED};
    use crate::peniko::{Blob, ImageAlphaType, ImageFormat};

    fn alpha(color: Color) -> f32 {
        color.components[3]
    }

    #[test]
    fn solid_alpha_is_multiplied() {
        let fill = FillType::solid(RED.with_alpha(0.5));
        let paint = resolve(&fill, 0.5, ImageQuality::Medium, Affine::IDENTITY)
            .unwrap()
            .unwrap();
        let ResolvedPaint::Solid(color) = paint else {
            panic!("expected a solid paint, got {paint:?}");
        };
        assert_eq!(alpha(color), 0.25);
        assert_eq!(color.components[0], 1.0);
    }

    #[test]
    fn gradient_stops_are_sorted_and_scaled() {
        let gradient =
            Gradient::new_linear((0.0, 0.0), (10.0, 0.0)).with_stops([(1.0, BLUE), (0.0, RED)]);
        let paint = resolve(
            &gradient.into(),
            0.5,
            ImageQuality::Medium,
            Affine::translate((3.0, 4.0)),
        )
        .unwrap()
        .unwrap();
        let ResolvedPaint::Gradient {
            stops, transform, ..
        } = paint
        else {
            panic!("expected a gradient");
        };
        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[0].color, RED.multiply_alpha(0.5));
        assert_eq!(stops[1].color, BLUE.multiply_alpha(0.5));
        assert_eq!(transform, Affine::translate((3.0, 4.0)));
    }

    #[test]
    fn duplicate_offsets_keep_insertion_order() {
        let gradient = Gradient::new_linear((0.0, 0.0), (10.0, 0.0)).with_stops([
            (0.0, RED),
            (0.5, LIME),
            (0.5, BLUE),
            (1.0, BLUE),
        ]);
        let paint = resolve(&gradient.into(), 1.0, ImageQuality::Medium, Affine::IDENTITY)
            .unwrap()
            .unwrap();
        let ResolvedPaint::Gradient { stops, .. } = paint else {
            panic!("expected a gradient");
        };
        assert_eq!(stops[1].color, LIME);
        assert_eq!(stops[2].color, BLUE);
        assert_eq!(stops[1].offset, stops[2].offset);
    }

    #[test]
    fn degenerate_gradients_resolve_to_nothing() {
        let same_points =
            Gradient::new_linear((5.0, 5.0), (5.0, 5.0)).with_stops([RED, BLUE].as_slice());
        assert!(
            resolve(&same_points.into(), 1.0, ImageQuality::Medium, Affine::IDENTITY)
                .unwrap()
                .is_none()
        );
        let no_stops = Gradient::new_radial((5.0, 5.0), 4.0);
        assert!(
            resolve(&no_stops.into(), 1.0, ImageQuality::Medium, Affine::IDENTITY)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn single_stop_becomes_solid() {
        let gradient = Gradient::new_radial((5.0, 5.0), 4.0).with_stops([(0.3, RED)]);
        let paint = resolve(&gradient.into(), 1.0, ImageQuality::Medium, Affine::IDENTITY)
            .unwrap()
            .unwrap();
        assert_eq!(paint, ResolvedPaint::Solid(RED));
    }

    #[test]
    fn sweep_is_unsupported() {
        let gradient =
            Gradient::new_sweep((5.0, 5.0), 0.0, 1.0).with_stops([RED, BLUE].as_slice());
        let err = resolve(&gradient.into(), 1.0, ImageQuality::Medium, Affine::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedGradient("sweep")));
    }

    #[test]
    fn image_pattern_composes_transforms() {
        let image = ImageData {
            data: Blob::from(vec![255_u8; 4 * 4]),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width: 2,
            height: 2,
        };
        let fill = FillType::tiled_image(image, Affine::scale(2.0));
        let paint = resolve(
            &fill,
            0.75,
            ImageQuality::High,
            Affine::translate((10.0, 0.0)),
        )
        .unwrap()
        .unwrap();
        let ResolvedPaint::Pattern {
            transform,
            opacity,
            quality,
            ..
        } = paint
        else {
            panic!("expected a pattern");
        };
        assert_eq!(transform, Affine::translate((10.0, 0.0)) * Affine::scale(2.0));
        assert_eq!(opacity, 0.75);
        assert_eq!(quality, ImageQuality::High);
    }
}
