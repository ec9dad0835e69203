// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster sources — where image metadata and chunk bytes come from.
//
// A source describes exactly one image and hands out its chunks (strips or
// tiles) either as stored on disk or fully decoded. Planar images number
// their chunks plane by plane.

pub mod decoded;
pub mod memory;

use rasterps_core::error::Result;
use rasterps_core::types::ImageDescriptor;

pub use decoded::DecodedImageSource;
pub use memory::MemorySource;

/// Which representation of a chunk to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Compressed exactly as stored.
    Raw,
    /// Fully decoded samples, `ImageDescriptor::decoded_chunk_len` bytes.
    Decoded,
}

/// Supplier of one image to the document writer.
pub trait RasterSource {
    /// Metadata of the image. May be called more than once.
    fn image_metadata(&mut self) -> Result<ImageDescriptor>;

    /// Number of chunks the source can deliver.
    fn chunk_count(&self) -> usize;

    /// Read chunk `index` into `buf`, returning the number of bytes written.
    /// `buf` is at least [`byte_count_for_chunk`](Self::byte_count_for_chunk)
    /// bytes long.
    fn read_chunk(&mut self, index: usize, kind: ChunkKind, buf: &mut [u8]) -> Result<usize>;

    /// Size of chunk `index` in the given representation, used to size the
    /// read buffer.
    fn byte_count_for_chunk(&self, index: usize, kind: ChunkKind) -> u64;
}

impl<S: RasterSource + ?Sized> RasterSource for &mut S {
    fn image_metadata(&mut self) -> Result<ImageDescriptor> {
        (**self).image_metadata()
    }

    fn chunk_count(&self) -> usize {
        (**self).chunk_count()
    }

    fn read_chunk(&mut self, index: usize, kind: ChunkKind, buf: &mut [u8]) -> Result<usize> {
        (**self).read_chunk(index, kind, buf)
    }

    fn byte_count_for_chunk(&self, index: usize, kind: ChunkKind) -> u64 {
        (**self).byte_count_for_chunk(index, kind)
    }
}
