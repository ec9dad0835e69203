// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the rasterps transcoder: image descriptors as reported
// by a raster source, and the tag-level enums that drive colorspace and
// filter decisions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};

/// PostScript points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Target PostScript language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OutputLevel {
    /// `image`/`colorimage` with hex data; no filters or dictionaries.
    Level1,
    /// Filters, image dictionaries, `setpagedevice`.
    Level2,
    /// Level 2 plus `FlateDecode`.
    Level3,
}

impl OutputLevel {
    pub fn number(&self) -> u8 {
        match self {
            Self::Level1 => 1,
            Self::Level2 => 2,
            Self::Level3 => 3,
        }
    }

    /// Whether the interpreter understands filters and image dictionaries.
    pub fn has_filters(&self) -> bool {
        !matches!(self, Self::Level1)
    }
}

impl TryFrom<u8> for OutputLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Level1),
            2 => Ok(Self::Level2),
            3 => Ok(Self::Level3),
            other => Err(format!("PostScript level must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<OutputLevel> for u8 {
    fn from(level: OutputLevel) -> Self {
        level.number()
    }
}

/// Photometric interpretation of the stored samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Photometric {
    MinIsWhite,
    MinIsBlack,
    Rgb,
    Palette,
    Mask,
    Separated,
    YCbCr,
    CieLab,
    IccLab,
    ItuLab,
    LogL,
    LogLuv,
}

impl Photometric {
    /// Map a TIFF `PhotometricInterpretation` value.
    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            0 => Ok(Self::MinIsWhite),
            1 => Ok(Self::MinIsBlack),
            2 => Ok(Self::Rgb),
            3 => Ok(Self::Palette),
            4 => Ok(Self::Mask),
            5 => Ok(Self::Separated),
            6 => Ok(Self::YCbCr),
            8 => Ok(Self::CieLab),
            9 => Ok(Self::IccLab),
            10 => Ok(Self::ItuLab),
            32844 => Ok(Self::LogL),
            32845 => Ok(Self::LogLuv),
            other => Err(TranscodeError::UnsupportedLayout(format!(
                "unknown photometric interpretation {other}"
            ))),
        }
    }
}

/// Horizontal differencing applied before LZW/Deflate compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Predictor {
    #[default]
    None,
    Horizontal,
    FloatingPoint,
}

impl Predictor {
    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            1 => Ok(Self::None),
            2 => Ok(Self::Horizontal),
            3 => Ok(Self::FloatingPoint),
            other => Err(TranscodeError::UnsupportedLayout(format!(
                "unknown predictor {other}"
            ))),
        }
    }
}

/// Group 3 fax options (TIFF `T4Options` bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Group3Options {
    pub two_dimensional: bool,
    pub uncompressed: bool,
    pub fill_bits: bool,
}

impl Group3Options {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            two_dimensional: bits & 0x1 != 0,
            uncompressed: bits & 0x2 != 0,
            fill_bits: bits & 0x4 != 0,
        }
    }
}

/// Compression scheme of the stored chunks.
///
/// Closed on purpose: every scheme the transcoder knows is a variant, and
/// unknown tags are rejected by [`Compression::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    CcittRle,
    CcittRleW,
    CcittFax3(Group3Options),
    CcittFax4,
    Lzw(Predictor),
    OJpeg,
    Jpeg,
    AdobeDeflate(Predictor),
    Deflate(Predictor),
    PackBits,
    Next,
    ThunderScan,
    PixarFilm,
    PixarLog,
    SgiLog,
    SgiLog24,
    Jbig,
    Jp2000,
    Lzma,
    Zstd,
    Webp,
}

impl Compression {
    /// Map a TIFF `Compression` value. Predictor and Group 3 options take
    /// their defaults; see [`Compression::with_predictor`] and
    /// [`Compression::with_group3_options`].
    pub fn from_tag(tag: u16) -> Result<Self> {
        let compression = match tag {
            1 => Self::None,
            2 => Self::CcittRle,
            3 => Self::CcittFax3(Group3Options::default()),
            4 => Self::CcittFax4,
            5 => Self::Lzw(Predictor::None),
            6 => Self::OJpeg,
            7 => Self::Jpeg,
            8 => Self::AdobeDeflate(Predictor::None),
            32766 => Self::Next,
            32771 => Self::CcittRleW,
            32773 => Self::PackBits,
            32809 => Self::ThunderScan,
            32908 => Self::PixarFilm,
            32909 => Self::PixarLog,
            32946 => Self::Deflate(Predictor::None),
            34661 => Self::Jbig,
            34676 => Self::SgiLog,
            34677 => Self::SgiLog24,
            34712 => Self::Jp2000,
            34925 => Self::Lzma,
            50000 => Self::Zstd,
            50001 => Self::Webp,
            other => return Err(TranscodeError::CannotTranscode { tag: other }),
        };
        Ok(compression)
    }

    /// The TIFF tag value for this scheme.
    pub fn tag(&self) -> u16 {
        match self {
            Self::None => 1,
            Self::CcittRle => 2,
            Self::CcittFax3(_) => 3,
            Self::CcittFax4 => 4,
            Self::Lzw(_) => 5,
            Self::OJpeg => 6,
            Self::Jpeg => 7,
            Self::AdobeDeflate(_) => 8,
            Self::Next => 32766,
            Self::CcittRleW => 32771,
            Self::PackBits => 32773,
            Self::ThunderScan => 32809,
            Self::PixarFilm => 32908,
            Self::PixarLog => 32909,
            Self::Deflate(_) => 32946,
            Self::Jbig => 34661,
            Self::SgiLog => 34676,
            Self::SgiLog24 => 34677,
            Self::Jp2000 => 34712,
            Self::Lzma => 34925,
            Self::Zstd => 50000,
            Self::Webp => 50001,
        }
    }

    /// Replace the predictor of an LZW or Deflate scheme. Other schemes are
    /// returned unchanged.
    pub fn with_predictor(self, predictor: Predictor) -> Self {
        match self {
            Self::Lzw(_) => Self::Lzw(predictor),
            Self::AdobeDeflate(_) => Self::AdobeDeflate(predictor),
            Self::Deflate(_) => Self::Deflate(predictor),
            other => other,
        }
    }

    /// Replace the Group 3 options of a Fax3 scheme.
    pub fn with_group3_options(self, options: Group3Options) -> Self {
        match self {
            Self::CcittFax3(_) => Self::CcittFax3(options),
            other => other,
        }
    }

    /// Any of the four CCITT schemes.
    pub fn is_ccitt(&self) -> bool {
        matches!(
            self,
            Self::CcittRle | Self::CcittRleW | Self::CcittFax3(_) | Self::CcittFax4
        )
    }

    /// Old-style or new-style JPEG.
    pub fn is_jpeg(&self) -> bool {
        matches!(self, Self::OJpeg | Self::Jpeg)
    }
}

/// How samples of a pixel are arranged in the chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanarConfig {
    /// RGBRGB...: all samples of a pixel are adjacent.
    #[default]
    Chunky,
    /// One plane per sample, each in its own set of chunks.
    Planar,
}

/// Meaning of an extra (non-color) sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraSample {
    Unspecified,
    AssociatedAlpha,
    UnassociatedAlpha,
}

impl ExtraSample {
    pub fn from_tag(tag: u16) -> Self {
        match tag {
            1 => Self::AssociatedAlpha,
            2 => Self::UnassociatedAlpha,
            _ => Self::Unspecified,
        }
    }
}

/// Unit of the X/Y resolution and position fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionUnit {
    #[default]
    None,
    Inch,
    Centimeter,
}

impl ResolutionUnit {
    pub fn from_tag(tag: u16) -> Self {
        match tag {
            2 => Self::Inch,
            3 => Self::Centimeter,
            _ => Self::None,
        }
    }
}

/// Palette of a `Photometric::Palette` image. Entries are 16-bit as stored;
/// some writers put 8-bit values in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    pub red: Vec<u16>,
    pub green: Vec<u16>,
    pub blue: Vec<u16>,
}

impl Colormap {
    pub fn len(&self) -> usize {
        self.red.len().min(self.green.len()).min(self.blue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chunk organisation of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkLayout {
    Strips { rows_per_strip: u32 },
    Tiles { tile_width: u32, tile_height: u32 },
}

/// Where a chunk sits inside the image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRegion {
    /// Left column of the chunk.
    pub x: u32,
    /// Top row of the chunk.
    pub y: u32,
    /// Columns stored in the chunk (full tile width for tiles).
    pub width: u32,
    /// Rows stored in the chunk (full tile height for tiles, clipped for the
    /// last strip).
    pub height: u32,
    /// Sample plane (always 0 for chunky images).
    pub plane: u16,
}

/// Per-image metadata reported by a raster source.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub planar: PlanarConfig,
    pub photometric: Photometric,
    pub compression: Compression,
    pub extra_samples: Vec<ExtraSample>,
    /// Horizontal position in resolution units.
    pub x_position: f64,
    /// Vertical position in resolution units.
    pub y_position: f64,
    /// Pixels per resolution unit, if recorded.
    pub x_resolution: Option<f64>,
    pub y_resolution: Option<f64>,
    pub resolution_unit: ResolutionUnit,
    pub colormap: Option<Colormap>,
    pub layout: ChunkLayout,
}

impl ImageDescriptor {
    /// An uncompressed, single-strip, chunky image with no resolution info.
    pub fn new(width: u32, height: u32, bits_per_sample: u16, samples_per_pixel: u16, photometric: Photometric) -> Self {
        Self {
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            planar: PlanarConfig::Chunky,
            photometric,
            compression: Compression::None,
            extra_samples: Vec::new(),
            x_position: 0.0,
            y_position: 0.0,
            x_resolution: None,
            y_resolution: None,
            resolution_unit: ResolutionUnit::None,
            colormap: None,
            layout: ChunkLayout::Strips {
                rows_per_strip: height.max(1),
            },
        }
    }

    /// Samples per pixel that carry color.
    pub fn color_samples(&self) -> u16 {
        self.samples_per_pixel
            .saturating_sub(self.extra_samples.len() as u16)
    }

    /// Exactly one extra sample, and it is associated alpha.
    pub fn has_associated_alpha(&self) -> bool {
        self.extra_samples == [ExtraSample::AssociatedAlpha]
    }

    /// Number of sample planes stored separately.
    pub fn planes(&self) -> u16 {
        match self.planar {
            PlanarConfig::Chunky => 1,
            PlanarConfig::Planar => self.samples_per_pixel,
        }
    }

    /// Samples interleaved in one chunk.
    pub fn samples_per_chunk(&self) -> u16 {
        match self.planar {
            PlanarConfig::Chunky => self.samples_per_pixel,
            PlanarConfig::Planar => 1,
        }
    }

    fn validate_dimensions(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TranscodeError::InvalidGeometry(format!(
                "image is {}x{} pixels",
                self.width, self.height
            )));
        }
        match self.layout {
            ChunkLayout::Strips { rows_per_strip: 0 } => Err(TranscodeError::InvalidGeometry(
                "rows per strip is zero".into(),
            )),
            ChunkLayout::Tiles { tile_width, tile_height } if tile_width == 0 || tile_height == 0 => {
                Err(TranscodeError::InvalidGeometry(format!(
                    "tile size is {tile_width}x{tile_height}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Chunks across and down a single plane.
    pub fn chunk_grid(&self) -> Result<(u32, u32)> {
        self.validate_dimensions()?;
        Ok(match self.layout {
            ChunkLayout::Strips { rows_per_strip } => (1, self.height.div_ceil(rows_per_strip)),
            ChunkLayout::Tiles { tile_width, tile_height } => (
                self.width.div_ceil(tile_width),
                self.height.div_ceil(tile_height),
            ),
        })
    }

    /// Chunks making up one sample plane.
    pub fn chunks_per_plane(&self) -> Result<usize> {
        let (across, down) = self.chunk_grid()?;
        (across as usize)
            .checked_mul(down as usize)
            .ok_or_else(|| TranscodeError::InvalidGeometry("chunk count overflows".into()))
    }

    /// Total chunks over all planes.
    pub fn chunk_count(&self) -> Result<usize> {
        self.chunks_per_plane()?
            .checked_mul(self.planes() as usize)
            .ok_or_else(|| TranscodeError::InvalidGeometry("chunk count overflows".into()))
    }

    /// Locate chunk `index` within the image.
    pub fn chunk_region(&self, index: usize) -> Result<ChunkRegion> {
        let per_plane = self.chunks_per_plane()?;
        let (across, _) = self.chunk_grid()?;
        if index >= self.chunk_count()? {
            return Err(TranscodeError::ChunkReadFailure {
                chunk: index,
                detail: format!("image has only {} chunks", self.chunk_count()?),
            });
        }
        let plane = (index / per_plane) as u16;
        let within = index % per_plane;
        let region = match self.layout {
            ChunkLayout::Strips { rows_per_strip } => {
                let y = within as u32 * rows_per_strip;
                ChunkRegion {
                    x: 0,
                    y,
                    width: self.width,
                    height: rows_per_strip.min(self.height - y),
                    plane,
                }
            }
            ChunkLayout::Tiles { tile_width, tile_height } => ChunkRegion {
                x: (within as u32 % across) * tile_width,
                y: (within as u32 / across) * tile_height,
                width: tile_width,
                height: tile_height,
                plane,
            },
        };
        Ok(region)
    }

    /// Bytes in one decoded row of `pixels` pixels with `samples` samples each.
    pub fn row_bytes(&self, pixels: u32, samples: u16) -> Result<u64> {
        row_bytes(pixels, samples, self.bits_per_sample)
    }

    /// Size of chunk `index` once decoded.
    pub fn decoded_chunk_len(&self, index: usize) -> Result<u64> {
        let region = self.chunk_region(index)?;
        self.row_bytes(region.width, self.samples_per_chunk())?
            .checked_mul(region.height as u64)
            .ok_or_else(|| TranscodeError::InvalidGeometry(format!("chunk {index} size overflows")))
    }

    /// Horizontal and vertical pixels per inch, honouring an optional unit
    /// override. Missing or unit-less resolution falls back to 72 dpi so one
    /// pixel maps to one point.
    pub fn pixels_per_inch(&self, unit_override: Option<ResolutionUnit>) -> (f64, f64) {
        let unit = unit_override.unwrap_or(self.resolution_unit);
        let per_inch = |res: Option<f64>| match (res, unit) {
            (Some(r), ResolutionUnit::Inch) if r > 0.0 => r,
            (Some(r), ResolutionUnit::Centimeter) if r > 0.0 => r * 2.54,
            _ => POINTS_PER_INCH,
        };
        (per_inch(self.x_resolution), per_inch(self.y_resolution))
    }

    /// Natural image size in points.
    pub fn size_in_points(&self, unit_override: Option<ResolutionUnit>) -> (f64, f64) {
        let (xres, yres) = self.pixels_per_inch(unit_override);
        (
            self.width as f64 * POINTS_PER_INCH / xres,
            self.height as f64 * POINTS_PER_INCH / yres,
        )
    }

    /// X/Y position converted to points.
    pub fn position_in_points(&self, unit_override: Option<ResolutionUnit>) -> (f64, f64) {
        let factor = match unit_override.unwrap_or(self.resolution_unit) {
            ResolutionUnit::Centimeter => POINTS_PER_INCH / 2.54,
            ResolutionUnit::Inch | ResolutionUnit::None => POINTS_PER_INCH,
        };
        (self.x_position * factor, self.y_position * factor)
    }
}

/// Bytes needed for `pixels` pixels of `samples` samples at `bits` each,
/// rounded up to a whole byte. Fails instead of wrapping on overflow.
pub fn row_bytes(pixels: u32, samples: u16, bits: u16) -> Result<u64> {
    (pixels as u64)
        .checked_mul(samples as u64)
        .and_then(|v| v.checked_mul(bits as u64))
        .and_then(|v| v.checked_add(7))
        .map(|v| v / 8)
        .ok_or_else(|| TranscodeError::InvalidGeometry("row stride overflows".into()))
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
        }
    }

    /// Dimensions in inches (width, height). US sizes are exact.
    pub fn dimensions_in(&self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
            other => {
                let (w, h) = other.dimensions_mm();
                (w as f64 / 25.4, h as f64 / 25.4)
            }
        }
    }

    /// Parse a preset name such as `a4` or `letter`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "a3" => Some(Self::A3),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            "tabloid" | "ledger" => Some(Self::Tabloid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_compression_is_rejected() {
        match Compression::from_tag(12345) {
            Err(TranscodeError::CannotTranscode { tag }) => assert_eq!(tag, 12345),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn compression_tags_round_trip() {
        for tag in [1u16, 2, 3, 4, 5, 6, 7, 8, 32771, 32773, 32946, 34712, 50001] {
            assert_eq!(Compression::from_tag(tag).unwrap().tag(), tag);
        }
    }

    #[test]
    fn predictor_only_applies_to_lzw_and_deflate() {
        let lzw = Compression::Lzw(Predictor::None).with_predictor(Predictor::Horizontal);
        assert_eq!(lzw, Compression::Lzw(Predictor::Horizontal));
        assert_eq!(
            Compression::PackBits.with_predictor(Predictor::Horizontal),
            Compression::PackBits
        );
    }

    #[test]
    fn strip_regions_clip_last_strip() {
        let mut desc = ImageDescriptor::new(10, 25, 8, 1, Photometric::MinIsBlack);
        desc.layout = ChunkLayout::Strips { rows_per_strip: 10 };
        assert_eq!(desc.chunk_count().unwrap(), 3);
        let last = desc.chunk_region(2).unwrap();
        assert_eq!((last.y, last.height), (20, 5));
        assert_eq!(desc.decoded_chunk_len(2).unwrap(), 50);
    }

    #[test]
    fn planar_chunks_are_plane_major() {
        let mut desc = ImageDescriptor::new(4, 4, 8, 3, Photometric::Rgb);
        desc.planar = PlanarConfig::Planar;
        desc.layout = ChunkLayout::Strips { rows_per_strip: 2 };
        assert_eq!(desc.chunk_count().unwrap(), 6);
        let region = desc.chunk_region(3).unwrap();
        assert_eq!((region.plane, region.y), (1, 2));
        assert_eq!(desc.decoded_chunk_len(3).unwrap(), 8);
    }

    #[test]
    fn tile_regions_walk_row_major() {
        let mut desc = ImageDescriptor::new(40, 20, 8, 1, Photometric::MinIsBlack);
        desc.layout = ChunkLayout::Tiles {
            tile_width: 16,
            tile_height: 16,
        };
        assert_eq!(desc.chunk_grid().unwrap(), (3, 2));
        let region = desc.chunk_region(4).unwrap();
        assert_eq!((region.x, region.y), (16, 16));
        assert_eq!(desc.decoded_chunk_len(4).unwrap(), 256);
    }

    #[test]
    fn row_bytes_rounds_up_and_rejects_overflow() {
        assert_eq!(row_bytes(10, 1, 1).unwrap(), 2);
        assert_eq!(row_bytes(3, 3, 4).unwrap(), 5);
        assert!(row_bytes(u32::MAX, u16::MAX, u16::MAX).is_ok());

        let mut desc = ImageDescriptor::new(1, 1, 8, u16::MAX, Photometric::MinIsBlack);
        desc.layout = ChunkLayout::Tiles {
            tile_width: u32::MAX,
            tile_height: u32::MAX,
        };
        assert!(matches!(
            desc.decoded_chunk_len(0),
            Err(TranscodeError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn size_in_points_uses_resolution() {
        let mut desc = ImageDescriptor::new(300, 150, 8, 1, Photometric::MinIsBlack);
        assert_eq!(desc.size_in_points(None), (300.0, 150.0));
        desc.x_resolution = Some(300.0);
        desc.y_resolution = Some(300.0);
        desc.resolution_unit = ResolutionUnit::Inch;
        assert_eq!(desc.size_in_points(None), (72.0, 36.0));
        let (w, _) = desc.size_in_points(Some(ResolutionUnit::Centimeter));
        assert!((w - 300.0 * 72.0 / (300.0 * 2.54)).abs() < 1e-9);
    }

    #[test]
    fn output_level_parses_from_number() {
        assert_eq!(OutputLevel::try_from(3).unwrap(), OutputLevel::Level3);
        assert!(OutputLevel::try_from(4).is_err());
        assert!(OutputLevel::Level2 > OutputLevel::Level1);
    }

    #[test]
    fn paper_presets_in_inches() {
        assert_eq!(PaperSize::Letter.dimensions_in(), (8.5, 11.0));
        let (w, h) = PaperSize::A4.dimensions_in();
        assert!((w - 8.2677).abs() < 1e-3 && (h - 11.6929).abs() < 1e-3);
        assert_eq!(PaperSize::from_name("LEDGER"), Some(PaperSize::Tabloid));
    }

    #[test]
    fn every_paper_name_is_a_preset() {
        let names = [
            ("a4", PaperSize::A4),
            ("a3", PaperSize::A3),
            ("a5", PaperSize::A5),
            ("letter", PaperSize::Letter),
            ("legal", PaperSize::Legal),
            ("tabloid", PaperSize::Tabloid),
        ];
        for (name, paper) in names {
            assert_eq!(PaperSize::from_name(name), Some(paper));
            let (w, h) = paper.dimensions_in();
            assert!(w > 0.0 && h > w);
        }
        assert_eq!(PaperSize::from_name("210x297"), None);
    }
}
