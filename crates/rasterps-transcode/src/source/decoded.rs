// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster source over an image decoded by the `image` crate.
//
// The pixels are held uncompressed and handed out as strips of roughly
// `STRIP_BYTES` bytes, so raw and decoded chunks are identical.

use std::path::Path;

use image::DynamicImage;
use rasterps_core::error::{Result, TranscodeError};
use rasterps_core::types::{
    ChunkLayout, ExtraSample, ImageDescriptor, Photometric, ResolutionUnit,
};
use tracing::{debug, info, instrument};

use super::{ChunkKind, RasterSource};

/// Target size of one strip.
pub const STRIP_BYTES: u64 = 8192;

/// An in-memory image exposed as an uncompressed strip image.
pub struct DecodedImageSource {
    descriptor: ImageDescriptor,
    samples: Vec<u8>,
}

impl DecodedImageSource {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            TranscodeError::Decode(format!("failed to open {}: {}", path.as_ref().display(), err))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Self::from_dynamic(img)
    }

    /// Decode an image held in memory (PNG, TIFF, JPEG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| TranscodeError::Decode(format!("failed to decode image: {err}")))?;
        Self::from_dynamic(img)
    }

    /// Wrap an already-decoded image.
    ///
    /// Gray and RGB images keep their channel count; 16-bit and float images
    /// are reduced to 8 bits. Alpha is premultiplied and declared as
    /// associated alpha.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        let color = img.color();
        let (photometric, spp, alpha, samples) = match img {
            DynamicImage::ImageLuma8(buf) => (Photometric::MinIsBlack, 1, false, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (Photometric::Rgb, 3, false, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (Photometric::MinIsBlack, 2, true, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (Photometric::Rgb, 4, true, buf.into_raw()),
            other => match (color.has_color(), color.has_alpha()) {
                (false, false) => (Photometric::MinIsBlack, 1, false, other.to_luma8().into_raw()),
                (false, true) => (Photometric::MinIsBlack, 2, true, other.to_luma_alpha8().into_raw()),
                (true, false) => (Photometric::Rgb, 3, false, other.to_rgb8().into_raw()),
                (true, true) => (Photometric::Rgb, 4, true, other.to_rgba8().into_raw()),
            },
        };

        let mut samples = samples;
        let mut descriptor = ImageDescriptor::new(width, height, 8, spp, photometric);
        if alpha {
            premultiply(&mut samples, spp as usize);
            descriptor.extra_samples = vec![ExtraSample::AssociatedAlpha];
        }
        descriptor.layout = strip_layout(&descriptor)?;
        debug!(?color, width, height, samples_per_pixel = spp, "wrapped decoded image");
        Ok(Self { descriptor, samples })
    }

    // -- Adjustments ----------------------------------------------------------

    /// Record a resolution so the image has a physical size.
    pub fn with_resolution(mut self, x: f64, y: f64, unit: ResolutionUnit) -> Self {
        self.descriptor.x_resolution = Some(x);
        self.descriptor.y_resolution = Some(y);
        self.descriptor.resolution_unit = unit;
        self
    }

    /// Reduce a gray image without alpha to 1 bit per sample: values at or
    /// above `threshold` become white. Other images are returned unchanged.
    pub fn into_bilevel(self, threshold: u8) -> Result<Self> {
        let desc = &self.descriptor;
        if desc.photometric != Photometric::MinIsBlack
            || desc.samples_per_pixel != 1
            || desc.bits_per_sample != 8
        {
            return Ok(self);
        }
        let width = desc.width as usize;
        let stride = width.div_ceil(8);
        let mut packed = vec![0u8; stride * desc.height as usize];
        for (row, line) in self.samples.chunks(width).enumerate() {
            for (x, &value) in line.iter().enumerate() {
                if value >= threshold {
                    packed[row * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        let mut descriptor = ImageDescriptor::new(desc.width, desc.height, 1, 1, Photometric::MinIsBlack);
        descriptor.x_resolution = desc.x_resolution;
        descriptor.y_resolution = desc.y_resolution;
        descriptor.resolution_unit = desc.resolution_unit;
        descriptor.layout = strip_layout(&descriptor)?;
        Ok(Self {
            descriptor,
            samples: packed,
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    fn chunk_range(&self, index: usize) -> Option<(usize, usize)> {
        let ChunkLayout::Strips { rows_per_strip } = self.descriptor.layout else {
            return None;
        };
        let stride = self.descriptor.row_bytes(self.descriptor.width, self.descriptor.samples_per_pixel).ok()?;
        let start = (index as u64).checked_mul(rows_per_strip as u64)?.checked_mul(stride)?;
        let len = self.descriptor.decoded_chunk_len(index).ok()?;
        let end = start.checked_add(len)?;
        Some((usize::try_from(start).ok()?, usize::try_from(end).ok()?))
    }
}

impl RasterSource for DecodedImageSource {
    fn image_metadata(&mut self) -> Result<ImageDescriptor> {
        Ok(self.descriptor.clone())
    }

    fn chunk_count(&self) -> usize {
        self.descriptor.chunk_count().unwrap_or(0)
    }

    fn read_chunk(&mut self, index: usize, _kind: ChunkKind, buf: &mut [u8]) -> Result<usize> {
        let (start, end) = self
            .chunk_range(index)
            .filter(|&(_, end)| end <= self.samples.len())
            .ok_or_else(|| TranscodeError::ChunkReadFailure {
                chunk: index,
                detail: "strip outside the decoded image".into(),
            })?;
        let n = (end - start).min(buf.len());
        buf[..n].copy_from_slice(&self.samples[start..start + n]);
        Ok(n)
    }

    fn byte_count_for_chunk(&self, index: usize, _kind: ChunkKind) -> u64 {
        self.descriptor.decoded_chunk_len(index).unwrap_or(0)
    }
}

/// Strips of about `STRIP_BYTES`, at least one row each.
fn strip_layout(desc: &ImageDescriptor) -> Result<ChunkLayout> {
    let stride = desc.row_bytes(desc.width, desc.samples_per_pixel)?.max(1);
    let rows = (STRIP_BYTES / stride).clamp(1, desc.height.max(1) as u64) as u32;
    Ok(ChunkLayout::Strips { rows_per_strip: rows })
}

/// Scale color samples by alpha: `c * a / 255`, rounded.
fn premultiply(samples: &mut [u8], spp: usize) {
    for pixel in samples.chunks_mut(spp) {
        let Some((&mut alpha, color)) = pixel.split_last_mut() else {
            continue;
        };
        for c in color {
            *c = ((*c as u32 * alpha as u32 + 127) / 255) as u8;
        }
    }
}
