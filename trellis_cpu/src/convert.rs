// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions from kurbo and peniko types to their tiny-skia counterparts.

use tiny_skia::{FilterQuality, FillRule, LineCap, LineJoin, PathBuilder, SpreadMode, Transform};
use trellis::kurbo::{Affine, BezPath, Cap, Join, PathEl, Stroke};
use trellis::peniko::{Color, Extend, Fill, ImageQuality};

/// Converts a kurbo path, returning `None` when nothing drawable remains.
pub(crate) fn path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32);
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

pub(crate) fn transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

pub(crate) fn fill_rule(fill: Fill) -> FillRule {
    match fill {
        Fill::NonZero => FillRule::Winding,
        Fill::EvenOdd => FillRule::EvenOdd,
    }
}

pub(crate) fn stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    let dash = if stroke.dash_pattern.is_empty() {
        None
    } else {
        tiny_skia::StrokeDash::new(
            stroke.dash_pattern.iter().map(|&d| d as f32).collect(),
            stroke.dash_offset as f32,
        )
    };
    tiny_skia::Stroke {
        width: stroke.width as f32,
        miter_limit: stroke.miter_limit as f32,
        line_cap: match stroke.start_cap {
            Cap::Butt => LineCap::Butt,
            Cap::Square => LineCap::Square,
            Cap::Round => LineCap::Round,
        },
        line_join: match stroke.join {
            Join::Bevel => LineJoin::Bevel,
            Join::Miter => LineJoin::Miter,
            Join::Round => LineJoin::Round,
        },
        dash,
    }
}

/// Converts a color, clamping each component to the unit range.
pub(crate) fn color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.components.map(|c| c.clamp(0.0, 1.0));
    tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::TRANSPARENT)
}

pub(crate) fn spread_mode(extend: Extend) -> SpreadMode {
    match extend {
        Extend::Pad => SpreadMode::Pad,
        Extend::Repeat => SpreadMode::Repeat,
        Extend::Reflect => SpreadMode::Reflect,
    }
}

pub(crate) fn filter_quality(quality: ImageQuality) -> FilterQuality {
    match quality {
        ImageQuality::Low => FilterQuality::Nearest,
        ImageQuality::Medium => FilterQuality::Bilinear,
        ImageQuality::High => FilterQuality::Bicubic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis::kurbo::{Point, Rect, Shape};
    use trellis::peniko::color::palette::css::RED;

    #[test]
    fn transform_keeps_coefficient_order() {
        let affine = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let converted = transform(affine);
        let mut p = [tiny_skia::Point::from_xy(1.0, 1.0)];
        converted.map_points(&mut p);
        let expected = affine * Point::new(1.0, 1.0);
        assert_eq!((p[0].x, p[0].y), (expected.x as f32, expected.y as f32));
    }

    #[test]
    fn rect_path_keeps_bounds() {
        let outline = Rect::new(1.0, 2.0, 11.0, 22.0).to_path(0.1);
        let converted = path(&outline).unwrap();
        let bounds = converted.bounds();
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom()),
            (1.0, 2.0, 11.0, 22.0)
        );
    }

    #[test]
    fn empty_path_is_none() {
        assert!(path(&BezPath::new()).is_none());
    }

    #[test]
    fn out_of_range_color_is_clamped() {
        let mut bright = RED;
        bright.components[0] = 4.0;
        bright.components[3] = -1.0;
        let converted = color(bright);
        assert_eq!(converted.red(), 1.0);
        assert_eq!(converted.alpha(), 0.0);
    }

    #[test]
    fn dashes_survive_conversion() {
        let dashed = Stroke::new(2.0).with_dashes(0.0, [4.0, 2.0]);
        assert!(stroke(&dashed).dash.is_some());
        assert!(stroke(&Stroke::new(2.0)).dash.is_none());
    }
}
