// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colorspace and decode-array resolution.
//
// Maps the photometric interpretation, bit depth and color sample count of an
// image onto a PostScript colorspace plus the `/Decode` array that tells the
// interpreter how stored sample values map onto color components.

use std::fmt::Write as _;

use rasterps_core::error::{Result, TranscodeError};
use rasterps_core::types::{Colormap, Compression, Photometric, row_bytes};
use tracing::debug;

/// Output colorspace of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    /// Palette lookup into DeviceRGB; `table` holds `hival + 1` RGB triples.
    Indexed { hival: u16, table: Vec<u8> },
}

impl ColorSpace {
    /// Components per sample as seen by `image`.
    pub fn components(&self) -> u16 {
        match self {
            Self::DeviceGray | Self::Indexed { .. } => 1,
            Self::DeviceRgb => 3,
            Self::DeviceCmyk => 4,
        }
    }

    /// Family name for the simple device spaces.
    pub fn device_name(&self) -> Option<&'static str> {
        match self {
            Self::DeviceGray => Some("/DeviceGray"),
            Self::DeviceRgb => Some("/DeviceRGB"),
            Self::DeviceCmyk => Some("/DeviceCMYK"),
            Self::Indexed { .. } => None,
        }
    }
}

/// Result of resolving an image's color model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorResolution {
    pub colorspace: ColorSpace,
    /// Pairs of (min, max) per component.
    pub decode: Vec<u32>,
    /// MinIsWhite data inverted by the CCITT filter (`/BlackIs1 false`)
    /// instead of by the decode array.
    pub invert_via_filter: bool,
}

impl ColorResolution {
    /// `[ 0 1 ... ]` as written into an image dictionary.
    pub fn decode_array(&self) -> String {
        let mut out = String::from("[");
        for value in &self.decode {
            let _ = write!(out, " {value}");
        }
        out.push_str(" ]");
        out
    }

    /// Whether sample value 0 means white (decode starts with 1).
    pub fn is_inverted(&self) -> bool {
        self.decode.first() == Some(&1) && matches!(self.colorspace, ColorSpace::DeviceGray)
    }
}

/// Table-driven colorspace resolver.
pub struct ColorSpaceResolver;

impl ColorSpaceResolver {
    /// Resolve the colorspace of an image.
    ///
    /// `compression` is the compression of the bytes that will actually be
    /// emitted: the stored scheme for passthrough, `Compression::None` when
    /// samples are re-encoded.
    pub fn resolve(
        photometric: Photometric,
        bits_per_sample: u16,
        color_samples: u16,
        compression: &Compression,
        colormap: Option<&Colormap>,
    ) -> Result<ColorResolution> {
        if !matches!(bits_per_sample, 1 | 2 | 4 | 8) {
            return Err(TranscodeError::UnsupportedBitDepth(bits_per_sample));
        }

        let unsupported = || TranscodeError::UnsupportedPhotometric {
            photometric,
            color_samples,
        };

        let resolution = match (photometric, color_samples) {
            (Photometric::MinIsBlack, 1) => ColorResolution {
                colorspace: ColorSpace::DeviceGray,
                decode: vec![0, 1],
                invert_via_filter: false,
            },
            (Photometric::MinIsWhite, 1) if compression.is_ccitt() => ColorResolution {
                colorspace: ColorSpace::DeviceGray,
                decode: vec![0, 1],
                invert_via_filter: true,
            },
            (Photometric::MinIsWhite, 1) => ColorResolution {
                colorspace: ColorSpace::DeviceGray,
                decode: vec![1, 0],
                invert_via_filter: false,
            },
            (Photometric::Palette, 1) => {
                let colormap = colormap.ok_or(TranscodeError::MissingColormap)?;
                let table = palette_table(colormap, bits_per_sample)?;
                let hival = (table.len() / 3 - 1) as u16;
                ColorResolution {
                    colorspace: ColorSpace::Indexed { hival, table },
                    decode: vec![0, (1u32 << bits_per_sample) - 1],
                    invert_via_filter: false,
                }
            }
            (Photometric::Rgb, 3) => ColorResolution {
                colorspace: ColorSpace::DeviceRgb,
                decode: vec![0, 1, 0, 1, 0, 1],
                invert_via_filter: false,
            },
            // JPEG decoders hand back RGB for YCbCr data.
            (Photometric::YCbCr, 3) if compression.is_jpeg() => ColorResolution {
                colorspace: ColorSpace::DeviceRgb,
                decode: vec![0, 1, 0, 1, 0, 1],
                invert_via_filter: false,
            },
            (Photometric::Separated, 4) => ColorResolution {
                colorspace: ColorSpace::DeviceCmyk,
                decode: vec![0, 1, 0, 1, 0, 1, 0, 1],
                invert_via_filter: false,
            },
            _ => return Err(unsupported()),
        };

        debug!(
            ?photometric,
            bits_per_sample,
            color_samples,
            decode = %resolution.decode_array(),
            "resolved colorspace"
        );
        Ok(resolution)
    }
}

/// Build the 8-bit RGB lookup table of a palette image.
///
/// Only the first `2^bits` entries are addressable. When every entry fits in a
/// byte the map is taken to be 8-bit already; otherwise each value is rescaled
/// `v * 255 / 65535`.
pub fn palette_table(colormap: &Colormap, bits_per_sample: u16) -> Result<Vec<u8>> {
    let entries = colormap.len().min(1usize << bits_per_sample);
    if entries == 0 {
        return Err(TranscodeError::MissingColormap);
    }

    let sixteen_bit = colormap.red[..entries]
        .iter()
        .chain(&colormap.green[..entries])
        .chain(&colormap.blue[..entries])
        .any(|&v| v > 255);
    if !sixteen_bit {
        debug!("assuming 8-bit colormap");
    }
    let scale = |v: u16| -> u8 {
        if sixteen_bit {
            (v as u32 * 255 / 65535) as u8
        } else {
            v as u8
        }
    };

    let mut table = Vec::with_capacity(entries * 3);
    for i in 0..entries {
        table.push(scale(colormap.red[i]));
        table.push(scale(colormap.green[i]));
        table.push(scale(colormap.blue[i]));
    }
    Ok(table)
}

/// Expand packed palette indices to 8-bit RGB, row by row.
///
/// Used at level 1, which has no `/Indexed` colorspace. Indices beyond the
/// table map to black.
pub fn expand_palette(
    indices: &[u8],
    bits_per_sample: u16,
    width: u32,
    rows: u32,
    table: &[u8],
) -> Result<Vec<u8>> {
    let stride = row_bytes(width, 1, bits_per_sample)? as usize;
    let mut out = Vec::with_capacity(width as usize * rows as usize * 3);
    let per_byte = 8 / bits_per_sample as usize;
    let mask = ((1u16 << bits_per_sample) - 1) as u8;

    for row in indices.chunks(stride).take(rows as usize) {
        for x in 0..width as usize {
            let byte = row.get(x / per_byte).copied().unwrap_or(0);
            let shift = 8 - bits_per_sample as usize * (x % per_byte + 1);
            let index = ((byte >> shift) & mask) as usize;
            match table.get(index * 3..index * 3 + 3) {
                Some(rgb) => out.extend_from_slice(rgb),
                None => out.extend_from_slice(&[0, 0, 0]),
            }
        }
    }
    Ok(out)
}

/// Flip every bit, turning MinIsWhite samples into MinIsBlack ones at any
/// supported bit depth.
pub fn invert_samples(samples: &mut [u8]) {
    for byte in samples {
        *byte = !*byte;
    }
}
