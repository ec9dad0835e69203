// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Argument parsing, option assembly and file handling for the `rasterps`
// binary. The document itself is produced by rasterps-transcode.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rasterps_core::{OutputLevel, PaperSize, ResolutionUnit, TranscodeOptions};
use rasterps_transcode::{DecodedImageSource, DocumentWriter};
use sha2::{Digest, Sha256};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "rasterps", version)]
#[command(about = "Convert raster images to PostScript")]
pub struct Cli {
    /// Images to convert (PNG, TIFF, JPEG, ...). Each starts a new page.
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Write the document here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON file with default options; flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// PostScript language level.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    level: Option<u8>,

    /// Encode data as hex instead of ASCII85.
    #[arg(long)]
    no_ascii85: bool,

    #[arg(long)]
    interpolate: bool,

    /// Request two-sided printing.
    #[arg(long)]
    duplex: bool,

    /// Bind on the short edge (with --duplex).
    #[arg(long)]
    tumble: bool,

    /// Shrink pages into the printer's imageable area.
    #[arg(long)]
    avoid_dead_zone: bool,

    #[arg(long = "rotate-180")]
    rotate_180: bool,

    /// Draw 1-bit gray images with imagemask.
    #[arg(long)]
    imagemask: bool,

    /// Paper preset (a4, a3, a5, letter, legal, tabloid).
    #[arg(long, value_name = "NAME")]
    paper: Option<String>,

    /// Page width in inches.
    #[arg(long, value_name = "INCHES")]
    width: Option<f64>,

    /// Page height in inches.
    #[arg(long, value_name = "INCHES")]
    height: Option<f64>,

    #[arg(long, value_name = "INCHES")]
    left_margin: Option<f64>,

    #[arg(long, value_name = "INCHES")]
    bottom_margin: Option<f64>,

    /// Split images taller than this across several pages.
    #[arg(long, value_name = "INCHES")]
    split_height: Option<f64>,

    /// Overlap between split pages.
    #[arg(long, value_name = "INCHES")]
    overlap: Option<f64>,

    /// Centre images on the page.
    #[arg(long)]
    center: bool,

    /// Produce Encapsulated PostScript (one page).
    #[arg(long)]
    eps: bool,

    /// Treat image resolution as pixels per centimetre.
    #[arg(long, conflicts_with = "inches")]
    cm: bool,

    /// Treat image resolution as pixels per inch.
    #[arg(long)]
    inches: bool,

    /// Image resolution in dots per inch (default: one pixel per point).
    #[arg(long, value_name = "DPI")]
    dpi: Option<f64>,

    /// Reduce gray images to 1 bit; values at or above this are white.
    #[arg(long, value_name = "LEVEL")]
    threshold: Option<u8>,

    /// %%Title comment (default: first input file name).
    #[arg(long)]
    title: Option<String>,
}

impl Cli {
    /// Config file (if any) with the command-line flags applied on top.
    fn options(&self) -> Result<TranscodeOptions> {
        let mut options = match &self.config {
            Some(path) => TranscodeOptions::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => TranscodeOptions::default(),
        };

        if let Some(level) = self.level {
            options.level = OutputLevel::try_from(level).map_err(anyhow::Error::msg)?;
        }
        if self.no_ascii85 {
            options.ascii85 = false;
        }
        options.interpolate |= self.interpolate;
        options.duplex |= self.duplex;
        options.tumble |= self.tumble;
        options.avoid_dead_zone |= self.avoid_dead_zone;
        options.rotate_180 |= self.rotate_180;
        options.prefer_imagemask |= self.imagemask;
        options.center |= self.center;
        options.eps |= self.eps;

        if let Some(name) = &self.paper {
            let paper = PaperSize::from_name(name).with_context(|| format!("unknown paper size '{name}'"))?;
            options = options.with_paper(paper);
        }
        let lengths = [
            (self.width, &mut options.page_width),
            (self.height, &mut options.page_height),
            (self.left_margin, &mut options.left_margin),
            (self.bottom_margin, &mut options.bottom_margin),
            (self.split_height, &mut options.max_page_height),
            (self.overlap, &mut options.split_overlap),
        ];
        for (flag, field) in lengths {
            if let Some(value) = flag {
                anyhow::ensure!(value.is_finite(), "lengths must be finite numbers");
                *field = value;
            }
        }

        if self.cm {
            options.resolution_unit = Some(ResolutionUnit::Centimeter);
        } else if self.inches {
            options.resolution_unit = Some(ResolutionUnit::Inch);
        }

        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        } else if options.title.is_none() {
            options.title = self
                .inputs
                .first()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned());
        }
        Ok(options)
    }

    fn open_source(&self, path: &Path) -> Result<DecodedImageSource> {
        let mut source = DecodedImageSource::open(path)?;
        if let Some(dpi) = self.dpi {
            anyhow::ensure!(dpi > 0.0, "--dpi must be positive");
            source = source.with_resolution(dpi, dpi, ResolutionUnit::Inch);
        }
        if let Some(threshold) = self.threshold {
            source = source.into_bilevel(threshold)?;
        }
        Ok(source)
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub pages: u32,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the document.
    pub sha256: String,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let options = cli.options()?;

    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let (writer, summary) = convert(&cli, options, BufWriter::new(file))?;
            writer
                .into_inner()
                .map_err(|err| err.into_error())
                .with_context(|| format!("failed to write {}", path.display()))?;
            summary
        }
        None => convert(&cli, options, io::stdout().lock())?.1,
    };

    info!(
        pages = summary.pages,
        bytes = summary.bytes,
        sha256 = %summary.sha256,
        "Document written"
    );
    Ok(())
}

/// Transcode every input into `sink`. A failing image is logged and skipped;
/// the document is still completed, then the failure is reported.
fn convert<W: Write>(cli: &Cli, options: TranscodeOptions, sink: W) -> Result<(W, Summary)> {
    let mut writer = DocumentWriter::new(DigestWriter::new(sink), options);
    let mut failed = 0usize;

    for path in &cli.inputs {
        let result = cli.open_source(path).and_then(|mut source| {
            writer.write_image(&mut source)?;
            Ok(())
        });
        if let Err(err) = result {
            error!(path = %path.display(), "{err:#}");
            failed += 1;
        }
    }

    let pages = writer.session().pages_emitted();
    let digest = writer.finish().context("failed to finish document")?;
    let (sink, bytes, sha256) = digest.finish();
    anyhow::ensure!(failed == 0, "{failed} of {} image(s) could not be converted", cli.inputs.len());
    Ok((sink, Summary { pages, bytes, sha256 }))
}

/// Passes writes through while hashing them.
pub struct DigestWriter<W: Write> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
}

impl<W: Write> DigestWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    /// The inner writer, the byte count and the hex digest.
    pub fn finish(self) -> (W, u64, String) {
        (self.inner, self.bytes, hex::encode(self.hasher.finalize()))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("rasterps").chain(args.iter().copied()))
    }

    #[test]
    fn flags_build_options() {
        let cli = parse(&[
            "--level", "3", "--no-ascii85", "--paper", "letter", "--left-margin", "0.5",
            "--split-height", "11", "--overlap", "0.25", "--cm", "--duplex", "scan.png",
        ]);
        let options = cli.options().unwrap();
        assert_eq!(options.level, OutputLevel::Level3);
        assert!(!options.ascii85);
        assert_eq!((options.page_width, options.page_height), (8.5, 11.0));
        assert_eq!(options.left_margin, 0.5);
        assert_eq!(options.max_page_height, 11.0);
        assert_eq!(options.split_overlap, 0.25);
        assert_eq!(options.resolution_unit, Some(ResolutionUnit::Centimeter));
        assert!(options.duplex);
        assert_eq!(options.title.as_deref(), Some("scan.png"));
    }

    #[test]
    fn explicit_size_overrides_paper() {
        let cli = parse(&["--paper", "a4", "--width", "5", "in.png"]);
        let options = cli.options().unwrap();
        assert_eq!(options.page_width, 5.0);
        assert!((options.page_height - 297.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn unknown_paper_is_an_error() {
        let cli = parse(&["--paper", "folio", "in.png"]);
        let err = cli.options().unwrap_err();
        assert_eq!(err.to_string(), "unknown paper size 'folio'");
    }

    #[test]
    fn level_out_of_range_is_rejected() {
        let result = Cli::try_parse_from(["rasterps", "--level", "4", "in.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn digest_matches_sha256() {
        let mut writer = DigestWriter::new(Vec::new());
        writer.write_all(b"hello").unwrap();
        let (inner, bytes, digest) = writer.finish();
        assert_eq!(inner, b"hello");
        assert_eq!(bytes, 5);
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
