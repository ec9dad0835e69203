// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — scale and translation of an image on a physical page, and
// the sequence of split pages for images taller than one page.
//
// The image is drawn into the unit square, so the `scale` operands are the
// image size on the page in points. Image row 0 is at the top.

use rasterps_core::config::TranscodeOptions;
use rasterps_core::error::{Result, TranscodeError};
use rasterps_core::types::POINTS_PER_INCH;
use tracing::debug;

use crate::ps;

/// Placement of an image on one physical page. All lengths in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    /// Physical page size, used for `setpagedevice` and bounding boxes.
    pub page_width: f64,
    pub page_height: f64,
    /// Page size minus the left/bottom margin.
    pub printable_width: f64,
    pub printable_height: f64,
    /// Natural image size.
    pub image_width: f64,
    pub image_height: f64,
    pub x_scale: f64,
    pub y_scale: f64,
    pub x_translate: f64,
    pub y_translate: f64,
    /// False for natural-size pages, which are only scaled.
    pub translated: bool,
    pub rotate_180: bool,
    /// Index of this page among the image's split pages.
    pub split_index: usize,
    /// Index of the next split page, 0 when this is the last one.
    pub next_split: usize,
    /// Band of the image visible on this page, measured from the top of the
    /// image, when splitting is active.
    pub band: Option<(f64, f64)>,
}

impl PageGeometry {
    /// Coordinate transform that maps the unit square onto the image area.
    pub fn transform(&self) -> String {
        let mut out = String::new();
        if self.translated {
            out.push_str(&format!(
                "{} {} translate\n",
                ps::number(self.x_translate),
                ps::number(self.y_translate)
            ));
        }
        out.push_str(&format!(
            "{} {} scale\n",
            ps::number(self.x_scale),
            ps::number(self.y_scale)
        ));
        if self.rotate_180 {
            out.push_str("1 1 translate 180 rotate\n");
        }
        out
    }

    pub fn is_split(&self) -> bool {
        self.band.is_some()
    }
}

/// Computes page geometry from the session options.
#[derive(Debug, Clone)]
pub struct PageLayoutPlanner {
    /// Requested page size in inches (0 = natural).
    page_width: f64,
    page_height: f64,
    margin_left: f64,
    margin_bottom: f64,
    /// Split threshold in inches (0 = never split).
    max_split_height: f64,
    overlap: f64,
    center: bool,
    rotate_180: bool,
}

impl PageLayoutPlanner {
    pub fn from_options(options: &TranscodeOptions) -> Self {
        Self {
            page_width: options.page_width,
            page_height: options.page_height,
            margin_left: options.left_margin,
            margin_bottom: options.bottom_margin,
            max_split_height: options.max_page_height,
            overlap: options.split_overlap,
            center: options.center,
            rotate_180: options.rotate_180,
        }
    }

    /// Whether an explicit page size was requested.
    pub fn has_page_size(&self) -> bool {
        self.page_width != 0.0 || self.page_height != 0.0
    }

    /// Physical page size in points for an image of the given natural size.
    /// A missing dimension falls back to the image's.
    pub fn page_size(&self, image_width: f64, image_height: f64) -> (f64, f64) {
        if !self.has_page_size() {
            return (image_width, image_height);
        }
        let w = if self.page_width != 0.0 {
            self.page_width * POINTS_PER_INCH
        } else {
            image_width + self.margin_left * POINTS_PER_INCH
        };
        let h = if self.page_height != 0.0 {
            self.page_height * POINTS_PER_INCH
        } else {
            image_height + self.margin_bottom * POINTS_PER_INCH
        };
        (w, h)
    }

    /// Every physical page needed for an image, in order.
    pub fn plan_image(&self, image_width: f64, image_height: f64) -> Result<Vec<PageGeometry>> {
        if !self.has_page_size() {
            return Ok(vec![self.plan_natural(image_width, image_height)]);
        }
        let mut pages = Vec::new();
        let mut split = 0;
        loop {
            let page = self.plan_page(image_width, image_height, split)?;
            split = page.next_split;
            pages.push(page);
            if split == 0 {
                break;
            }
        }
        debug!(pages = pages.len(), image_width, image_height, "planned image layout");
        Ok(pages)
    }

    /// Page exactly the size of the image, scaled with no translation.
    pub fn plan_natural(&self, image_width: f64, image_height: f64) -> PageGeometry {
        PageGeometry {
            page_width: image_width,
            page_height: image_height,
            printable_width: image_width,
            printable_height: image_height,
            image_width,
            image_height,
            x_scale: image_width,
            y_scale: image_height,
            x_translate: 0.0,
            y_translate: 0.0,
            translated: false,
            rotate_180: self.rotate_180,
            split_index: 0,
            next_split: 0,
            band: None,
        }
    }

    /// Place an image on page `split_index` of its split sequence.
    ///
    /// Width is scaled down to the printable width if necessary, never up.
    /// An image that fits vertically sits at the top of the printable area.
    /// One taller than a page but within the split threshold is squeezed onto
    /// the page. Anything taller is split: page `k` shows the band starting
    /// `k * (page height - overlap)` from the top of the image.
    ///
    /// Margins are used as given, including zero and negative values.
    pub fn plan_page(&self, image_width: f64, image_height: f64, split_index: usize) -> Result<PageGeometry> {
        let (page_width, page_height) = self.page_size(image_width, image_height);
        let left = self.margin_left * POINTS_PER_INCH;
        let bottom = self.margin_bottom * POINTS_PER_INCH;
        let printable_width = page_width - left;
        let printable_height = page_height - bottom;
        let split_height = self.max_split_height * POINTS_PER_INCH;
        let overlap = self.overlap * POINTS_PER_INCH;

        let x_scale = if image_width <= printable_width {
            image_width
        } else {
            printable_width
        };
        let mut x_tran = 0.0;

        let (y_scale, y_tran, next_split, band) = if image_height <= printable_height {
            if split_index != 0 {
                return Err(split_out_of_range(split_index));
            }
            let y_tran = if self.center {
                (printable_height - image_height) / 2.0
            } else {
                printable_height - image_height
            };
            (image_height, y_tran, 0, None)
        } else if split_height == 0.0 || image_height <= split_height {
            if split_index != 0 {
                return Err(split_out_of_range(split_index));
            }
            (printable_height, 0.0, 0, None)
        } else {
            let advance = printable_height - overlap;
            if advance <= 0.0 {
                return Err(TranscodeError::InvalidGeometry(format!(
                    "split overlap {overlap}pt leaves no room on a {printable_height}pt page"
                )));
            }
            if split_index > 0 && image_height - advance * (split_index - 1) as f64 <= printable_height {
                return Err(split_out_of_range(split_index));
            }
            let remaining = image_height - advance * split_index as f64;
            let next = if remaining <= printable_height {
                0
            } else {
                split_index + 1
            };
            let start = image_height - remaining;
            let band = (start, (start + printable_height).min(image_height));
            (image_height, printable_height - remaining, next, Some(band))
        };

        if self.center && band.is_none() {
            x_tran = (printable_width - x_scale) / 2.0;
        }

        Ok(PageGeometry {
            page_width,
            page_height,
            printable_width,
            printable_height,
            image_width,
            image_height,
            x_scale,
            y_scale,
            x_translate: left + x_tran,
            y_translate: bottom + y_tran,
            translated: true,
            rotate_180: self.rotate_180,
            split_index,
            next_split,
            band,
        })
    }
}

fn split_out_of_range(split_index: usize) -> TranscodeError {
    TranscodeError::InvalidGeometry(format!("split page {split_index} is past the end of the image"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(page_w: f64, page_h: f64) -> PageLayoutPlanner {
        PageLayoutPlanner::from_options(&TranscodeOptions {
            page_width: page_w,
            page_height: page_h,
            ..TranscodeOptions::default()
        })
    }

    #[test]
    fn natural_size_is_scale_only() {
        let p = planner(0.0, 0.0);
        let pages = p.plan_image(100.0, 50.0).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].transform(), "100 50 scale\n");
        assert_eq!((pages[0].page_width, pages[0].page_height), (100.0, 50.0));
    }

    #[test]
    fn short_image_sits_at_top() {
        let p = planner(8.5, 11.0);
        let g = p.plan_page(200.0, 100.0, 0).unwrap();
        assert_eq!((g.x_scale, g.y_scale), (200.0, 100.0));
        assert_eq!(g.y_translate, 792.0 - 100.0);
        assert_eq!(g.x_translate, 0.0);
        assert_eq!(g.next_split, 0);
    }

    #[test]
    fn wide_image_is_scaled_down_never_up() {
        let p = planner(8.5, 11.0);
        assert_eq!(p.plan_page(1000.0, 100.0, 0).unwrap().x_scale, 612.0);
        assert_eq!(p.plan_page(10.0, 100.0, 0).unwrap().x_scale, 10.0);
    }

    #[test]
    fn tall_image_without_split_fills_page() {
        let p = planner(8.5, 11.0);
        let g = p.plan_page(100.0, 2000.0, 0).unwrap();
        assert_eq!(g.y_scale, 792.0);
        assert_eq!(g.y_translate, 0.0);
        assert!(!g.is_split());
    }

    #[test]
    fn margins_are_not_clamped() {
        let p = PageLayoutPlanner::from_options(&TranscodeOptions {
            page_width: 8.5,
            page_height: 11.0,
            left_margin: -0.5,
            bottom_margin: 1.0,
            ..TranscodeOptions::default()
        });
        let g = p.plan_page(100.0, 100.0, 0).unwrap();
        assert_eq!(g.x_translate, -36.0);
        assert_eq!(g.printable_width, 648.0);
        assert_eq!(g.y_translate, 72.0 + (720.0 - 100.0));
    }

    #[test]
    fn centering_splits_the_slack() {
        let p = PageLayoutPlanner::from_options(&TranscodeOptions {
            page_width: 8.5,
            page_height: 11.0,
            center: true,
            ..TranscodeOptions::default()
        });
        let g = p.plan_page(212.0, 192.0, 0).unwrap();
        assert_eq!(g.x_translate, 200.0);
        assert_eq!(g.y_translate, 300.0);
    }

    #[test]
    fn rotation_appended_after_scale() {
        let p = PageLayoutPlanner::from_options(&TranscodeOptions {
            rotate_180: true,
            ..TranscodeOptions::default()
        });
        let g = p.plan_natural(10.0, 20.0);
        assert_eq!(g.transform(), "10 20 scale\n1 1 translate 180 rotate\n");
    }

    fn split_planner(overlap_in: f64) -> PageLayoutPlanner {
        PageLayoutPlanner::from_options(&TranscodeOptions {
            page_width: 8.5,
            page_height: 11.0,
            max_page_height: 11.0,
            split_overlap: overlap_in,
            ..TranscodeOptions::default()
        })
    }

    #[test]
    fn split_count_and_coverage() {
        let page = 792.0;
        for (height, overlap_in) in [(2000.0, 0.0), (2000.0, 1.0), (1585.0, 0.0), (5000.0, 0.5), (1584.0, 0.0)] {
            let pages = split_planner(overlap_in).plan_image(300.0, height).unwrap();
            let overlap = overlap_in * 72.0;
            let expected = ((height - overlap) / (page - overlap)).ceil() as usize;
            assert_eq!(pages.len(), expected, "height {height} overlap {overlap}");

            let mut covered = 0.0;
            for (k, g) in pages.iter().enumerate() {
                let (start, end) = g.band.unwrap();
                assert_eq!(g.split_index, k);
                assert!(start <= covered, "gap before page {k}");
                assert!(end > start);
                if k > 0 {
                    assert!((covered - start - overlap).abs() < 1e-9 || end == height);
                }
                covered = end;
                assert_eq!(g.y_scale, height);
                // Top of the image is pushed above the page by the band start.
                assert!((g.y_translate + height - page - start).abs() < 1e-9);
            }
            assert_eq!(covered, height);
            assert_eq!(pages.last().unwrap().next_split, 0);
        }
    }

    #[test]
    fn split_past_the_end_is_rejected() {
        let p = split_planner(0.0);
        assert!(p.plan_page(300.0, 1000.0, 1).is_ok());
        assert!(matches!(
            p.plan_page(300.0, 1000.0, 2),
            Err(TranscodeError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn overlap_as_tall_as_page_is_rejected() {
        let err = split_planner(11.0).plan_image(300.0, 5000.0).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidGeometry(_)));
    }
}
