// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uploading peniko images into tiny-skia pixmaps.

use tiny_skia::{IntSize, Pixmap};
use trellis::peniko::{ImageAlphaType, ImageData, ImageFormat};
use trellis::{Error, Result};

/// Multiplies a color channel by an alpha value, both in `0..=255`.
pub(crate) fn mul_u8(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

/// Converts `image` into a premultiplied RGBA pixmap.
pub(crate) fn to_pixmap(image: &ImageData) -> Result<Pixmap> {
    let swap_red_blue = match image.format {
        ImageFormat::Rgba8 => false,
        ImageFormat::Bgra8 => true,
        _ => return Err(Error::UnsupportedImageFormat),
    };
    let bytes = image.data.data();
    let expected = image
        .format
        .size_in_bytes(image.width, image.height)
        .ok_or(Error::InvalidImage {
            expected: usize::MAX,
            actual: bytes.len(),
        })?;
    if bytes.len() != expected {
        return Err(Error::InvalidImage {
            expected,
            actual: bytes.len(),
        });
    }
    let size = IntSize::from_wh(image.width, image.height).ok_or(Error::InvalidImage {
        expected,
        actual: bytes.len(),
    })?;

    let premultiplied = image.alpha_type == ImageAlphaType::AlphaPremultiplied;
    let mut data = vec![0_u8; expected];
    let src: &[[u8; 4]] = bytemuck::cast_slice(bytes);
    let dst: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut data);
    for (out, &pixel) in dst.iter_mut().zip(src) {
        let [r, g, b, a] = if swap_red_blue {
            [pixel[2], pixel[1], pixel[0], pixel[3]]
        } else {
            pixel
        };
        *out = if premultiplied {
            // tiny-skia rejects channels above alpha.
            [r.min(a), g.min(a), b.min(a), a]
        } else {
            [mul_u8(r, a), mul_u8(g, a), mul_u8(b, a), a]
        };
    }
    Pixmap::from_vec(data, size).ok_or(Error::SurfaceAllocation {
        width: image.width,
        height: image.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis::peniko::Blob;

    fn image(format: ImageFormat, alpha_type: ImageAlphaType, pixels: Vec<u8>) -> ImageData {
        ImageData {
            data: Blob::from(pixels),
            format,
            alpha_type,
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn straight_alpha_is_premultiplied() {
        let pixmap = to_pixmap(&image(
            ImageFormat::Rgba8,
            ImageAlphaType::Alpha,
            vec![255, 0, 100, 128],
        ))
        .unwrap();
        assert_eq!(pixmap.data(), &[128, 0, 50, 128]);
    }

    #[test]
    fn bgra_is_swizzled() {
        let pixmap = to_pixmap(&image(
            ImageFormat::Bgra8,
            ImageAlphaType::AlphaPremultiplied,
            vec![10, 20, 30, 255],
        ))
        .unwrap();
        assert_eq!(pixmap.data(), &[30, 20, 10, 255]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = to_pixmap(&image(
            ImageFormat::Rgba8,
            ImageAlphaType::Alpha,
            vec![0, 0, 0],
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidImage {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn channel_multiply_rounds() {
        assert_eq!(mul_u8(255, 255), 255);
        assert_eq!(mul_u8(255, 0), 0);
        assert_eq!(mul_u8(128, 128), 64);
    }
}
