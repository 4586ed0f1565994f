// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip regions as seen in rendered output.

use trellis::kurbo::{Affine, BezPath, Rect, Shape};
use trellis::peniko::color::palette::css::{RED, WHITE};
use trellis::peniko::Fill;
use trellis::{IntRect, Path};
use trellis_tests::{count_pixels, pixel, render, rgba8, solid_image, TestParams};

#[test]
fn empty_clip_leaves_the_surface_untouched() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        ctx.set_fill(RED);
        assert!(!ctx.clip_to_rectangle(IntRect::new(30, 30, 40, 40)));
        assert!(ctx.is_clip_empty());
        ctx.fill_all()?;
        ctx.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0))?;
        ctx.fill_int_rect(IntRect::new(0, 0, 20, 20), true)?;
        ctx.draw_image(&solid_image(4, 4, [255, 0, 0, 255]), Affine::IDENTITY)
    })
    .unwrap();
    assert_eq!(count_pixels(&target, rgba8(WHITE)), 400);
}

#[test]
fn excluded_rectangle_is_skipped() {
    let target = render(&TestParams::new(30, 30), |ctx| {
        ctx.set_fill(RED);
        ctx.exclude_clip_rectangle(IntRect::new(10, 10, 20, 20));
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(pixel(&target, 15, 15), rgba8(WHITE));
    assert_eq!(pixel(&target, 5, 15), rgba8(RED));
    assert_eq!(count_pixels(&target, rgba8(RED)), 30 * 30 - 10 * 10);
}

#[test]
fn rectangle_list_clip_is_a_union() {
    let target = render(&TestParams::new(30, 10), |ctx| {
        ctx.set_fill(RED);
        assert!(ctx.clip_to_rectangle_list(&[
            IntRect::new(0, 0, 10, 10),
            IntRect::new(20, 0, 30, 10),
        ]));
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(count_pixels(&target, rgba8(RED)), 200);
    assert_eq!(pixel(&target, 15, 5), rgba8(WHITE));
}

#[test]
fn path_clip_follows_the_outline() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        let mut triangle = BezPath::new();
        triangle.move_to((0.0, 0.0));
        triangle.line_to((20.0, 0.0));
        triangle.line_to((0.0, 20.0));
        triangle.close_path();
        ctx.clip_to_path(&Path::new(triangle), Affine::IDENTITY);
        ctx.set_fill(RED);
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(pixel(&target, 2, 2), rgba8(RED));
    assert_eq!(pixel(&target, 17, 17), rgba8(WHITE));
}

#[test]
fn even_odd_path_clip_leaves_a_hole() {
    let target = render(&TestParams::new(30, 30), |ctx| {
        let mut outline = Rect::new(0.0, 0.0, 30.0, 30.0).to_path(0.1);
        outline.extend(Rect::new(10.0, 10.0, 20.0, 20.0).path_elements(0.1));
        ctx.clip_to_path(
            &Path::new(outline).with_fill_rule(Fill::EvenOdd),
            Affine::IDENTITY,
        );
        ctx.set_fill(RED);
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(pixel(&target, 15, 15), rgba8(WHITE));
    assert_eq!(pixel(&target, 5, 5), rgba8(RED));
}

#[test]
fn image_alpha_clip_scales_coverage() {
    let target = render(&TestParams::new(20, 10), |ctx| {
        // Opaque on the left half, transparent on the right.
        let mut mask = solid_image(20, 10, [0, 0, 0, 255]);
        let mut data = mask.data.data().to_vec();
        for row in data.chunks_exact_mut(20 * 4) {
            for px in row[10 * 4..].chunks_exact_mut(4) {
                px[3] = 0;
            }
        }
        mask.data = data.into();
        ctx.clip_to_image_alpha(&mask, Affine::IDENTITY);
        ctx.set_fill(RED);
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(pixel(&target, 3, 5), rgba8(RED));
    assert_eq!(pixel(&target, 17, 5), rgba8(WHITE));
}

#[test]
fn clip_bounds_are_reported_in_user_space() {
    render(&TestParams::new(50, 50), |ctx| {
        ctx.clip_to_rectangle(IntRect::new(10, 10, 30, 40));
        ctx.set_origin(5, 5);
        assert_eq!(ctx.clip_bounds(), IntRect::new(5, 5, 25, 35));
        assert!(ctx.clip_region_intersects(IntRect::new(0, 0, 6, 6)));
        assert!(!ctx.clip_region_intersects(IntRect::new(30, 30, 40, 40)));
        Ok(())
    })
    .unwrap();
}
