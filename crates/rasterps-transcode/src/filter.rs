// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chunk encoding dispatch.
//
// Decides, per chunk, whether the stored (compressed) bytes can be forwarded
// verbatim inside a matching PostScript decode filter, or whether the raster
// source must hand over decoded samples that are then re-encoded as plain
// text. Passthrough is only ever chosen when the interpreter at the target
// language level has a native filter for the stored scheme.

use std::fmt::Write as _;

use rasterps_core::error::Result;
use rasterps_core::types::{Compression, Group3Options, OutputLevel, Predictor};
use tracing::debug;

use crate::encode::TextEncoding;
use crate::source::ChunkKind;

/// Geometry of a chunk as far as filter parameters are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterGeometry {
    /// Pixels per row in the chunk.
    pub columns: u32,
    /// Rows in the chunk.
    pub rows: u32,
    /// Samples per pixel in the stored data.
    pub colors: u16,
    pub bits_per_sample: u16,
    /// CCITT data decodes with 1 = black (MinIsBlack images).
    pub black_is_1: bool,
}

/// `/Predictor 2` parameter block for TIFF horizontal differencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    pub columns: u32,
    pub colors: u16,
    pub bits_per_component: u16,
}

/// A PostScript decode filter applied to passthrough bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    CcittFax {
        /// -1 = pure 2-D (Group 4), 0 = 1-D, >0 = mixed (Group 3 2-D).
        k: i32,
        columns: u32,
        rows: u32,
        end_of_line: bool,
        encoded_byte_align: bool,
        uncompressed: bool,
        black_is_1: bool,
    },
    Lzw { predictor: Option<PredictorParams> },
    RunLength,
    Flate { predictor: Option<PredictorParams> },
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CcittFax { .. } => "/CCITTFaxDecode",
            Self::Lzw { .. } => "/LZWDecode",
            Self::RunLength => "/RunLengthDecode",
            Self::Flate { .. } => "/FlateDecode",
        }
    }

    /// The parameter dictionary, if the filter takes one.
    pub fn parameters(&self) -> Option<String> {
        let mut out = String::new();
        match self {
            Self::CcittFax {
                k,
                columns,
                rows,
                end_of_line,
                encoded_byte_align,
                uncompressed,
                black_is_1,
            } => {
                out.push_str("<<\n");
                let _ = writeln!(out, "  /K {k}");
                let _ = writeln!(out, "  /Columns {columns}");
                let _ = writeln!(out, "  /Rows {rows}");
                let _ = writeln!(out, "  /EndOfLine {end_of_line}");
                let _ = writeln!(out, "  /EncodedByteAlign {encoded_byte_align}");
                if *uncompressed {
                    out.push_str("  /Uncompressed true\n");
                }
                out.push_str("  /EndOfBlock false\n");
                let _ = writeln!(out, "  /BlackIs1 {black_is_1}");
                out.push_str(">>");
            }
            Self::Lzw {
                predictor: Some(params),
            }
            | Self::Flate {
                predictor: Some(params),
            } => {
                out.push_str("<<\n  /Predictor 2\n");
                let _ = writeln!(out, "  /Columns {}", params.columns);
                let _ = writeln!(out, "  /Colors {}", params.colors);
                let _ = writeln!(out, "  /BitsPerComponent {}", params.bits_per_component);
                out.push_str(">>");
            }
            Self::Lzw { predictor: None } | Self::Flate { predictor: None } | Self::RunLength => {
                return None;
            }
        }
        Some(out)
    }

    /// `[params] /Name filter`, ready to append to a data source.
    pub fn header(&self) -> String {
        match self.parameters() {
            Some(params) => format!("{params} {} filter", self.name()),
            None => format!("{} filter", self.name()),
        }
    }
}

/// Passthrough or re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingPath {
    /// Forward stored bytes; `None` for uncompressed data.
    Passthrough(Option<Filter>),
    /// Ask the source for decoded samples and emit them as plain text.
    Reencode,
}

/// Complete per-chunk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingPlan {
    pub path: EncodingPath,
    pub text: TextEncoding,
    /// Bytes that will be fed to the text encoder.
    pub declared_len: u64,
}

impl EncodingPlan {
    pub fn is_passthrough(&self) -> bool {
        matches!(self.path, EncodingPath::Passthrough(_))
    }

    /// Which bytes to request from the raster source.
    pub fn chunk_kind(&self) -> ChunkKind {
        match self.path {
            EncodingPath::Passthrough(_) => ChunkKind::Raw,
            EncodingPath::Reencode => ChunkKind::Decoded,
        }
    }

    /// Level 2/3 `/DataSource` value: the inline text decoder followed by the
    /// passthrough filter, if any.
    pub fn data_source(&self) -> String {
        let mut out = format!("currentfile {} filter", self.text.decode_filter());
        if let EncodingPath::Passthrough(Some(filter)) = &self.path {
            out.push('\n');
            out.push_str(&filter.header());
        }
        out
    }
}

/// Selects the encoding path for chunks at a fixed output level.
#[derive(Debug, Clone, Copy)]
pub struct ChunkEncodingPlanner {
    level: OutputLevel,
    text: TextEncoding,
}

impl ChunkEncodingPlanner {
    /// `ascii85` is ignored at level 1, which only knows hex.
    pub fn new(level: OutputLevel, ascii85: bool) -> Self {
        let text = if ascii85 && level.has_filters() {
            TextEncoding::Ascii85
        } else {
            TextEncoding::Hex
        };
        Self { level, text }
    }

    pub fn level(&self) -> OutputLevel {
        self.level
    }

    pub fn text_encoding(&self) -> TextEncoding {
        self.text
    }

    /// Plan a chunk from its raw TIFF compression tag. Unknown tags are a
    /// `CannotTranscode` error, never a guess.
    pub fn plan_tag(&self, tag: u16, geometry: &FilterGeometry) -> Result<EncodingPath> {
        let compression = Compression::from_tag(tag)?;
        Ok(self.plan(&compression, geometry))
    }

    /// Pick passthrough or re-encode for a chunk stored with `compression`.
    pub fn plan(&self, compression: &Compression, geometry: &FilterGeometry) -> EncodingPath {
        let path = match compression {
            Compression::None => EncodingPath::Passthrough(None),

            Compression::CcittRle
            | Compression::CcittRleW
            | Compression::CcittFax3(_)
            | Compression::CcittFax4
                if self.level.has_filters() =>
            {
                EncodingPath::Passthrough(Some(ccitt_filter(compression, geometry)))
            }

            Compression::Lzw(predictor) if self.level.has_filters() => {
                match predictor_params(*predictor, geometry) {
                    Some(predictor) => EncodingPath::Passthrough(Some(Filter::Lzw { predictor })),
                    None => EncodingPath::Reencode,
                }
            }

            Compression::PackBits if self.level.has_filters() => {
                EncodingPath::Passthrough(Some(Filter::RunLength))
            }

            Compression::AdobeDeflate(predictor) | Compression::Deflate(predictor)
                if self.level == OutputLevel::Level3 =>
            {
                match predictor_params(*predictor, geometry) {
                    Some(predictor) => EncodingPath::Passthrough(Some(Filter::Flate { predictor })),
                    None => EncodingPath::Reencode,
                }
            }

            // Level 1 has no filters at all; Flate needs level 3.
            Compression::CcittRle
            | Compression::CcittRleW
            | Compression::CcittFax3(_)
            | Compression::CcittFax4
            | Compression::Lzw(_)
            | Compression::PackBits
            | Compression::AdobeDeflate(_)
            | Compression::Deflate(_) => EncodingPath::Reencode,

            // No PostScript filter matches these stored formats.
            Compression::OJpeg
            | Compression::Jpeg
            | Compression::Next
            | Compression::ThunderScan
            | Compression::PixarFilm
            | Compression::PixarLog
            | Compression::SgiLog
            | Compression::SgiLog24
            | Compression::Jbig
            | Compression::Jp2000
            | Compression::Lzma
            | Compression::Zstd
            | Compression::Webp => EncodingPath::Reencode,
        };

        debug!(
            compression = compression.tag(),
            level = self.level.number(),
            passthrough = matches!(path, EncodingPath::Passthrough(_)),
            "planned chunk encoding"
        );
        path
    }
}

/// `Some(None)` = no predictor block needed, `Some(Some(..))` = block
/// required, `None` = the predictor cannot be expressed as a filter.
fn predictor_params(predictor: Predictor, geometry: &FilterGeometry) -> Option<Option<PredictorParams>> {
    match predictor {
        Predictor::None => Some(None),
        Predictor::Horizontal if geometry.bits_per_sample == 8 => Some(Some(PredictorParams {
            columns: geometry.columns,
            colors: geometry.colors,
            bits_per_component: geometry.bits_per_sample,
        })),
        Predictor::Horizontal | Predictor::FloatingPoint => None,
    }
}

fn ccitt_filter(compression: &Compression, geometry: &FilterGeometry) -> Filter {
    let (k, end_of_line, encoded_byte_align, uncompressed) = match compression {
        Compression::CcittRle | Compression::CcittRleW => (0, false, true, false),
        Compression::CcittFax3(Group3Options {
            two_dimensional,
            uncompressed,
            fill_bits,
        }) => (i32::from(*two_dimensional), true, *fill_bits, *uncompressed),
        _ => (-1, false, false, false),
    };
    Filter::CcittFax {
        k,
        columns: geometry.columns,
        rows: geometry.rows,
        end_of_line,
        encoded_byte_align,
        uncompressed,
        black_is_1: geometry.black_is_1,
    }
}
