// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for rasterps.

use thiserror::Error;

use crate::types::Photometric;

/// Top-level error type for all transcoding operations.
#[derive(Debug, Error)]
pub enum TranscodeError {
    // -- Image description --
    #[error("unsupported photometric interpretation {photometric:?} with {color_samples} color sample(s)")]
    UnsupportedPhotometric {
        photometric: Photometric,
        color_samples: u16,
    },

    #[error("unsupported bits per sample: {0} (expected 1, 2, 4 or 8)")]
    UnsupportedBitDepth(u16),

    #[error("palette image has no colormap")]
    MissingColormap,

    #[error("unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    // -- Chunk handling --
    #[error("cannot transcode compression scheme {tag}")]
    CannotTranscode { tag: u16 },

    #[error("raster decode error: {0}")]
    Decode(String),

    #[error("failed to read chunk {chunk}: {detail}")]
    ChunkReadFailure { chunk: usize, detail: String },

    #[error("cannot allocate {requested} bytes of chunk scratch space")]
    AllocationFailure { requested: usize },

    // -- Document structure --
    #[error("invalid document state: {0}")]
    InvalidState(&'static str),

    // -- Context --
    #[error("image {index}: {source}")]
    Image {
        index: usize,
        #[source]
        source: Box<TranscodeError>,
    },

    // -- I/O / persistence --
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl TranscodeError {
    /// Attach the index of the image being transcoded.
    ///
    /// Already-wrapped errors are returned untouched so the innermost image
    /// index wins.
    pub fn in_image(self, index: usize) -> Self {
        match self {
            err @ TranscodeError::Image { .. } => err,
            other => TranscodeError::Image {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The error with any image context stripped off.
    pub fn root(&self) -> &TranscodeError {
        match self {
            TranscodeError::Image { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TranscodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_context_wraps_once() {
        let err = TranscodeError::MissingColormap.in_image(2).in_image(5);
        match &err {
            TranscodeError::Image { index, .. } => assert_eq!(*index, 2),
            other => panic!("unexpected error variant: {other}"),
        }
        assert!(matches!(err.root(), TranscodeError::MissingColormap));
        assert_eq!(err.to_string(), "image 2: palette image has no colormap");
    }

    #[test]
    fn chunk_failure_names_the_chunk() {
        let err = TranscodeError::ChunkReadFailure {
            chunk: 7,
            detail: "short read".into(),
        };
        assert_eq!(err.to_string(), "failed to read chunk 7: short read");
    }
}
