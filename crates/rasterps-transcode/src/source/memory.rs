// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory raster source with explicitly supplied chunks.

use rasterps_core::error::{Result, TranscodeError};
use rasterps_core::types::{ChunkLayout, Compression, ImageDescriptor};

use super::{ChunkKind, RasterSource};

/// A raster source backed by chunk buffers held in memory.
///
/// Raw and decoded chunks are supplied independently; reading a kind that
/// was never supplied is a `ChunkReadFailure`.
#[derive(Debug, Clone)]
pub struct MemorySource {
    descriptor: ImageDescriptor,
    raw: Option<Vec<Vec<u8>>>,
    decoded: Option<Vec<Vec<u8>>>,
}

impl MemorySource {
    pub fn new(descriptor: ImageDescriptor) -> Self {
        Self {
            descriptor,
            raw: None,
            decoded: None,
        }
    }

    /// Chunks exactly as stored, in chunk order.
    pub fn with_raw_chunks(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.raw = Some(chunks);
        self
    }

    /// Decoded samples, one buffer per chunk.
    pub fn with_decoded_chunks(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.decoded = Some(chunks);
        self
    }

    /// Cut a whole decoded strip image into its strips. The samples double as
    /// raw chunks when the descriptor says the image is uncompressed.
    pub fn from_samples(descriptor: ImageDescriptor, samples: &[u8]) -> Result<Self> {
        if !matches!(descriptor.layout, ChunkLayout::Strips { .. }) {
            return Err(TranscodeError::UnsupportedLayout(
                "only strip images can be cut from a sample buffer".into(),
            ));
        }
        let mut chunks = Vec::with_capacity(descriptor.chunk_count()?);
        let mut offset = 0usize;
        for index in 0..descriptor.chunk_count()? {
            let len = descriptor.decoded_chunk_len(index)? as usize;
            let end = offset.saturating_add(len).min(samples.len());
            chunks.push(samples[offset.min(end)..end].to_vec());
            offset = offset.saturating_add(len);
        }
        let uncompressed = descriptor.compression == Compression::None;
        let source = Self::new(descriptor).with_decoded_chunks(chunks.clone());
        Ok(if uncompressed {
            source.with_raw_chunks(chunks)
        } else {
            source
        })
    }

    fn chunks(&self, kind: ChunkKind) -> Option<&Vec<Vec<u8>>> {
        match kind {
            ChunkKind::Raw => self.raw.as_ref(),
            ChunkKind::Decoded => self.decoded.as_ref(),
        }
    }
}

impl RasterSource for MemorySource {
    fn image_metadata(&mut self) -> Result<ImageDescriptor> {
        Ok(self.descriptor.clone())
    }

    fn chunk_count(&self) -> usize {
        let raw = self.raw.as_ref().map_or(0, Vec::len);
        let decoded = self.decoded.as_ref().map_or(0, Vec::len);
        raw.max(decoded)
    }

    fn read_chunk(&mut self, index: usize, kind: ChunkKind, buf: &mut [u8]) -> Result<usize> {
        let chunk = self
            .chunks(kind)
            .ok_or_else(|| TranscodeError::ChunkReadFailure {
                chunk: index,
                detail: format!("no {kind:?} data supplied"),
            })?
            .get(index)
            .ok_or_else(|| TranscodeError::ChunkReadFailure {
                chunk: index,
                detail: "chunk index out of range".into(),
            })?;
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }

    fn byte_count_for_chunk(&self, index: usize, kind: ChunkKind) -> u64 {
        self.chunks(kind)
            .and_then(|chunks| chunks.get(index))
            .map_or(0, |chunk| chunk.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterps_core::types::Photometric;

    #[test]
    fn samples_are_cut_into_strips() {
        let mut desc = ImageDescriptor::new(4, 5, 8, 1, Photometric::MinIsBlack);
        desc.layout = ChunkLayout::Strips { rows_per_strip: 2 };
        let samples: Vec<u8> = (0..20).collect();
        let mut source = MemorySource::from_samples(desc, &samples).unwrap();
        assert_eq!(source.chunk_count(), 3);
        assert_eq!(source.byte_count_for_chunk(2, ChunkKind::Decoded), 4);
        assert_eq!(source.byte_count_for_chunk(2, ChunkKind::Raw), 4);

        let mut buf = [0u8; 8];
        assert_eq!(source.read_chunk(1, ChunkKind::Raw, &mut buf).unwrap(), 8);
        assert_eq!(buf, [8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn missing_kind_is_a_read_failure() {
        let desc = ImageDescriptor::new(1, 1, 8, 1, Photometric::MinIsBlack);
        let mut source = MemorySource::new(desc).with_decoded_chunks(vec![vec![0]]);
        let mut buf = [0u8; 1];
        let err = source.read_chunk(0, ChunkKind::Raw, &mut buf).unwrap_err();
        assert!(matches!(err, TranscodeError::ChunkReadFailure { chunk: 0, .. }));
        assert_eq!(source.byte_count_for_chunk(0, ChunkKind::Raw), 0);
    }

    #[test]
    fn tiles_cannot_be_cut() {
        let mut desc = ImageDescriptor::new(16, 16, 8, 1, Photometric::MinIsBlack);
        desc.layout = ChunkLayout::Tiles {
            tile_width: 16,
            tile_height: 16,
        };
        assert!(matches!(
            MemorySource::from_samples(desc, &[0; 256]),
            Err(TranscodeError::UnsupportedLayout(_))
        ));
    }
}
