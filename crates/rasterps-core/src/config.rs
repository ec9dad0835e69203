// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transcoding options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{OutputLevel, PaperSize, ResolutionUnit};

/// Options fixed for the lifetime of one output document.
///
/// Lengths are in inches. A page width/height of 0 means "use the image's
/// natural size"; a max page height of 0 disables splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// PostScript language level of the output.
    pub level: OutputLevel,
    /// Encode data as ASCII85 (level 2/3 only); hex otherwise.
    pub ascii85: bool,
    /// Ask the interpreter to interpolate image samples.
    pub interpolate: bool,
    /// Request two-sided printing.
    pub duplex: bool,
    /// Flip every other side (short-edge binding).
    pub tumble: bool,
    /// Shrink pages into the device's imageable area.
    pub avoid_dead_zone: bool,
    /// Rotate every page by 180 degrees.
    pub rotate_180: bool,
    /// Use `imagemask` for 1-bit grayscale images.
    pub prefer_imagemask: bool,
    /// Override the resolution unit recorded in the image.
    pub resolution_unit: Option<ResolutionUnit>,
    /// Requested page width (0 = natural size).
    pub page_width: f64,
    /// Requested page height (0 = natural size).
    pub page_height: f64,
    pub left_margin: f64,
    pub bottom_margin: f64,
    /// Images taller than this are split across pages (0 = never).
    pub max_page_height: f64,
    /// Overlap between consecutive split pages.
    pub split_overlap: f64,
    /// Centre the image in the printable area.
    pub center: bool,
    /// Produce Encapsulated PostScript (single page, no setup).
    pub eps: bool,
    /// `%%Creator` comment.
    pub creator: String,
    /// `%%Title` comment; the CLI fills in the input file name.
    pub title: Option<String>,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            level: OutputLevel::Level2,
            ascii85: true,
            interpolate: false,
            duplex: false,
            tumble: false,
            avoid_dead_zone: false,
            rotate_180: false,
            prefer_imagemask: false,
            resolution_unit: None,
            page_width: 0.0,
            page_height: 0.0,
            left_margin: 0.0,
            bottom_margin: 0.0,
            max_page_height: 0.0,
            split_overlap: 0.0,
            center: false,
            eps: false,
            creator: "rasterps".into(),
            title: None,
        }
    }
}

impl TranscodeOptions {
    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the page size from a paper preset.
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        let (w, h) = paper.dimensions_in();
        self.page_width = w;
        self.page_height = h;
        self
    }

    /// ASCII85 actually in effect. Level 1 has no ASCII85Decode filter.
    pub fn uses_ascii85(&self) -> bool {
        self.ascii85 && self.level.has_filters()
    }

    /// Whether an explicit output page size was requested.
    pub fn has_page_size(&self) -> bool {
        self.page_width != 0.0 || self.page_height != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts = TranscodeOptions::from_json(r#"{ "level": 3, "duplex": true }"#).unwrap();
        assert_eq!(opts.level, OutputLevel::Level3);
        assert!(opts.duplex);
        assert!(opts.ascii85);
        assert_eq!(opts.creator, "rasterps");
    }

    #[test]
    fn bad_level_is_a_config_error() {
        let err = TranscodeOptions::from_json(r#"{ "level": 7 }"#).unwrap_err();
        assert!(matches!(err, crate::TranscodeError::Config(_)));
    }

    #[test]
    fn ascii85_disabled_at_level_one() {
        let opts = TranscodeOptions {
            level: OutputLevel::Level1,
            ..TranscodeOptions::default()
        };
        assert!(opts.ascii85);
        assert!(!opts.uses_ascii85());
    }

    #[test]
    fn paper_preset_sets_page_size() {
        let opts = TranscodeOptions::default().with_paper(PaperSize::Letter);
        assert_eq!((opts.page_width, opts.page_height), (8.5, 11.0));
        assert!(opts.has_page_size());
        assert!(!TranscodeOptions::default().has_page_size());
    }
}
