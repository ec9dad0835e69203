// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Alpha matting and extra-sample removal for 8-bit chunky data.

use rasterps_core::types::ImageDescriptor;

/// Composites associated alpha onto a white background.
pub struct AlphaCompositor;

impl AlphaCompositor {
    /// Only images with exactly one extra sample, tagged as associated
    /// alpha, are composited.
    pub fn applies(desc: &ImageDescriptor) -> bool {
        desc.has_associated_alpha() && desc.bits_per_sample == 8
    }

    /// Replace every color sample by `sample + (255 - alpha)` and drop the
    /// alpha channel. The buffer shrinks to `color_samples / samples_per_pixel`
    /// of its length. Arithmetic wraps at 8 bits.
    ///
    /// The alpha sample is the first sample after the color samples.
    pub fn composite(buf: &mut Vec<u8>, samples_per_pixel: usize, color_samples: usize) {
        if samples_per_pixel == 0 || color_samples >= samples_per_pixel {
            return;
        }
        let mut write = 0;
        let mut read = 0;
        while read + samples_per_pixel <= buf.len() {
            let adjust = 255 - buf[read + color_samples];
            for c in 0..color_samples {
                buf[write] = buf[read + c].wrapping_add(adjust);
                write += 1;
            }
            read += samples_per_pixel;
        }
        buf.truncate(write);
    }
}

/// Keep the first `color_samples` of every pixel.
pub fn strip_extra_samples(buf: &mut Vec<u8>, samples_per_pixel: usize, color_samples: usize) {
    if samples_per_pixel == 0 || color_samples >= samples_per_pixel {
        return;
    }
    let mut write = 0;
    let mut read = 0;
    while read + samples_per_pixel <= buf.len() {
        buf.copy_within(read..read + color_samples, write);
        write += color_samples;
        read += samples_per_pixel;
    }
    buf.truncate(write);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterps_core::types::{ExtraSample, Photometric};

    #[test]
    fn rgba_matted_onto_white() {
        let mut buf = vec![10, 20, 30, 200, 0, 0, 0, 0];
        AlphaCompositor::composite(&mut buf, 4, 3);
        assert_eq!(buf, vec![65, 75, 85, 255, 255, 255]);
    }

    #[test]
    fn arithmetic_wraps() {
        // 250 + (255 - 100) = 405 -> 149
        let mut buf = vec![250, 100];
        AlphaCompositor::composite(&mut buf, 2, 1);
        assert_eq!(buf, vec![149]);
    }

    #[test]
    fn only_single_associated_alpha_applies() {
        let mut desc = ImageDescriptor::new(2, 1, 8, 4, Photometric::Rgb);
        desc.extra_samples = vec![ExtraSample::AssociatedAlpha];
        assert!(AlphaCompositor::applies(&desc));

        desc.extra_samples = vec![ExtraSample::UnassociatedAlpha];
        assert!(!AlphaCompositor::applies(&desc));

        desc.samples_per_pixel = 5;
        desc.extra_samples = vec![ExtraSample::AssociatedAlpha, ExtraSample::Unspecified];
        assert!(!AlphaCompositor::applies(&desc));
    }

    #[test]
    fn extra_samples_are_dropped() {
        let mut buf = vec![1, 2, 3, 9, 9, 4, 5, 6, 9, 9];
        strip_extra_samples(&mut buf, 5, 3);
        assert_eq!(buf, vec![1, 2, 3, 4, 5, 6]);
    }
}
