// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors that can occur while driving a render target.
///
/// Degenerate geometry is never reported here; those draws are skipped.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A glyph run was given a different number of glyphs and positions.
    #[error("glyph run has {glyphs} glyph ids but {positions} positions")]
    GlyphCountMismatch {
        /// Number of glyph identifiers supplied.
        glyphs: usize,
        /// Number of positions supplied.
        positions: usize,
    },
    /// The pixel data of an image doesn't match its declared size or format.
    #[error("image data is malformed: expected {expected} bytes, got {actual}")]
    InvalidImage {
        /// Number of bytes implied by the image dimensions and format.
        expected: usize,
        /// Number of bytes actually present.
        actual: usize,
    },
    /// An image uses a pixel format the target can't consume.
    #[error("unsupported image format")]
    UnsupportedImageFormat,
    /// The font data couldn't be parsed.
    #[error("couldn't read font data")]
    InvalidFont,
    /// The gradient kind can't be expressed by this context.
    #[error("unsupported gradient kind: {0}")]
    UnsupportedGradient(&'static str),
    /// The target couldn't allocate its drawing surface.
    #[error("couldn't allocate a {width}x{height} surface")]
    SurfaceAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The target couldn't allocate an offscreen transparency layer.
    #[error("couldn't allocate a {width}x{height} transparency layer")]
    LayerAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The target couldn't allocate a clip mask.
    #[error("couldn't allocate a clip mask")]
    MaskAllocation,
    /// The target refused to build a gradient or pattern shader.
    #[error("couldn't create a shader for the current fill")]
    ShaderCreation,
}

/// The broad class an [`Error`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed arguments that violate the operation's contract.
    InvalidArgument,
    /// The target ran out of some resource while building a native object.
    ResourceExhausted,
    /// The request is well formed but can't be honoured by this context.
    Unsupported,
}

impl Error {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GlyphCountMismatch { .. } | Self::InvalidImage { .. } | Self::InvalidFont => {
                ErrorKind::InvalidArgument
            }
            Self::SurfaceAllocation { .. }
            | Self::LayerAllocation { .. }
            | Self::MaskAllocation
            | Self::ShaderCreation => ErrorKind::ResourceExhausted,
            Self::UnsupportedImageFormat | Self::UnsupportedGradient(_) => ErrorKind::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_mismatch_is_invalid_argument() {
        let err = Error::GlyphCountMismatch {
            glyphs: 3,
            positions: 2,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "glyph run has 3 glyph ids but 2 positions"
        );
    }

    #[test]
    fn allocation_failures_are_resource_exhaustion() {
        let err = Error::LayerAllocation {
            width: 10,
            height: 20,
        };
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(Error::ShaderCreation.kind(), ErrorKind::ResourceExhausted);
    }
}
