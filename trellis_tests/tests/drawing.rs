// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive drawing through the pixmap target.

use trellis::kurbo::{Affine, Line, Rect, Shape};
use trellis::peniko::color::palette::css::{BLUE, RED, TRANSPARENT, WHITE};
use trellis::peniko::{Gradient, ImageQuality};
use trellis::{FillType, IntRect};
use trellis_tests::{close_to, count_pixels, pixel, render, rgba8, solid_image, TestParams};

#[test]
fn user_space_is_y_down() {
    let target = render(&TestParams::new(10, 10), |ctx| {
        ctx.set_fill(RED);
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 1.0))
    })
    .unwrap();
    assert_eq!(pixel(&target, 5, 0), rgba8(RED));
    assert_eq!(pixel(&target, 5, 9), rgba8(WHITE));
}

#[test]
fn replace_overwrites_instead_of_blending() {
    let params = TestParams::new(20, 10);
    let target = render(&params, |ctx| {
        ctx.set_fill(TRANSPARENT);
        ctx.fill_int_rect(IntRect::new(0, 0, 10, 10), true)?;
        ctx.fill_int_rect(IntRect::new(10, 0, 20, 10), false)
    })
    .unwrap();
    assert_eq!(pixel(&target, 5, 5), [0, 0, 0, 0]);
    assert_eq!(pixel(&target, 15, 5), rgba8(WHITE));
}

#[test]
fn replace_ignores_translucent_prior_content() {
    let params = TestParams {
        base_color: Some(BLUE.with_alpha(0.5)),
        ..TestParams::new(20, 10)
    };
    let target = render(&params, |ctx| {
        ctx.set_fill(RED);
        ctx.fill_int_rect(IntRect::new(0, 0, 10, 10), true)?;
        ctx.fill_int_rect(IntRect::new(10, 0, 20, 10), false)
    })
    .unwrap();
    assert_eq!(pixel(&target, 5, 5), rgba8(RED));
    // Opaque red over anything is still opaque red.
    assert_eq!(pixel(&target, 15, 5), rgba8(RED));

    let target = render(&params, |ctx| {
        ctx.set_fill(RED.with_alpha(0.5));
        ctx.fill_int_rect(IntRect::new(0, 0, 10, 10), true)?;
        ctx.fill_int_rect(IntRect::new(10, 0, 20, 10), false)
    })
    .unwrap();
    let replaced = pixel(&target, 5, 5);
    let blended = pixel(&target, 15, 5);
    assert!(close_to(replaced, [128, 0, 0, 128], 1), "{replaced:?}");
    assert!(blended[2] > 0 && blended[3] > replaced[3], "{blended:?}");
}

#[test]
fn rect_list_overlaps_are_filled_once() {
    let target = render(&TestParams::new(30, 10), |ctx| {
        ctx.set_fill(RED);
        ctx.set_opacity(0.5);
        ctx.fill_rect_list(&[
            Rect::new(0.0, 0.0, 20.0, 10.0),
            Rect::new(10.0, 0.0, 30.0, 10.0),
        ])
    })
    .unwrap();
    assert_eq!(pixel(&target, 5, 5), pixel(&target, 15, 5));
}

#[test]
fn lines_use_square_caps() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        ctx.set_fill(BLUE);
        ctx.draw_line_with_thickness(Line::new((5.0, 10.0), (15.0, 10.0)), 2.0)
    })
    .unwrap();
    // The caps extend half the width past each end.
    assert_eq!(pixel(&target, 4, 9), rgba8(BLUE));
    assert_eq!(pixel(&target, 15, 10), rgba8(BLUE));
    assert_eq!(pixel(&target, 10, 5), rgba8(WHITE));
    assert_eq!(count_pixels(&target, rgba8(BLUE)), 12 * 2);
}

#[test]
fn rect_outline_stays_inside() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        ctx.set_fill(RED);
        ctx.draw_rect(Rect::new(2.0, 2.0, 18.0, 18.0), 2.0)
    })
    .unwrap();
    assert_eq!(pixel(&target, 2, 2), rgba8(RED));
    assert_eq!(pixel(&target, 17, 10), rgba8(RED));
    assert_eq!(pixel(&target, 1, 1), rgba8(WHITE));
    assert_eq!(pixel(&target, 10, 10), rgba8(WHITE));
    assert_eq!(count_pixels(&target, rgba8(RED)), 16 * 16 - 12 * 12);
}

#[test]
fn ellipse_fills_its_center_only() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        ctx.set_fill(RED);
        ctx.fill_ellipse(Rect::new(0.0, 0.0, 20.0, 20.0))
    })
    .unwrap();
    assert_eq!(pixel(&target, 10, 10), rgba8(RED));
    assert_eq!(pixel(&target, 0, 0), rgba8(WHITE));
}

#[test]
fn linear_gradient_runs_in_user_space() {
    let target = render(&TestParams::new(100, 10), |ctx| {
        let gradient = Gradient::new_linear((0.0, 0.0), (100.0, 0.0))
            .with_stops([RED, BLUE].as_slice());
        ctx.set_fill(gradient);
        ctx.fill_all()
    })
    .unwrap();
    let left = pixel(&target, 0, 5);
    let right = pixel(&target, 99, 5);
    assert!(close_to(left, rgba8(RED), 8), "{left:?}");
    assert!(close_to(right, rgba8(BLUE), 8), "{right:?}");
    let middle = pixel(&target, 50, 5);
    assert!(middle[0] > 64 && middle[2] > 64, "{middle:?}");
}

#[test]
fn gradient_fill_ignores_the_path_transform() {
    let gradient =
        Gradient::new_linear((0.0, 0.0), (100.0, 0.0)).with_stops([RED, BLUE].as_slice());
    let scaled = render(&TestParams::new(100, 10), |ctx| {
        ctx.set_fill(gradient.clone());
        let path = trellis::Path::new(Rect::new(0.0, 0.0, 10.0, 1.0).to_path(0.1));
        ctx.fill_path(&path, Affine::scale(10.0))
    })
    .unwrap();
    let direct = render(&TestParams::new(100, 10), |ctx| {
        ctx.set_fill(gradient.clone());
        ctx.fill_rect(Rect::new(0.0, 0.0, 100.0, 10.0))
    })
    .unwrap();
    for x in [0, 25, 50, 75, 99] {
        assert!(close_to(pixel(&scaled, x, 5), pixel(&direct, x, 5), 1));
    }
}

#[test]
fn images_are_drawn_with_opacity() {
    let target = render(&TestParams::new(20, 20), |ctx| {
        ctx.set_interpolation_quality(ImageQuality::Low);
        ctx.set_opacity(0.5);
        ctx.draw_image(&solid_image(2, 2, [0, 0, 255, 255]), Affine::scale(5.0))
    })
    .unwrap();
    let inside = pixel(&target, 5, 5);
    assert!(close_to(inside, [127, 127, 255, 255], 2), "{inside:?}");
    assert_eq!(pixel(&target, 15, 15), rgba8(WHITE));
}

#[test]
fn tiled_image_fill_repeats() {
    let target = render(&TestParams::new(8, 8), |ctx| {
        let mut tile = solid_image(2, 1, [255, 0, 0, 255]);
        let mut data = tile.data.data().to_vec();
        data[4..8].copy_from_slice(&[0, 0, 255, 255]);
        tile.data = data.into();
        ctx.set_interpolation_quality(ImageQuality::Low);
        ctx.set_fill(FillType::tiled_image(tile, Affine::IDENTITY));
        ctx.fill_all()
    })
    .unwrap();
    assert_eq!(pixel(&target, 0, 0), rgba8(RED));
    assert_eq!(pixel(&target, 1, 3), rgba8(BLUE));
    assert_eq!(pixel(&target, 6, 7), rgba8(RED));
    assert_eq!(pixel(&target, 7, 7), rgba8(BLUE));
}

#[test]
fn physical_scale_tracks_the_transform() {
    render(&TestParams::new(10, 10), |ctx| {
        assert_eq!(ctx.physical_pixel_scale_factor(), 1.0);
        ctx.add_transform(Affine::scale(2.0));
        assert_eq!(ctx.physical_pixel_scale_factor(), 2.0);
        assert!(!ctx.is_vector_device());
        Ok(())
    })
    .unwrap();
}
