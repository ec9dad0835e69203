// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PostScript fragments shared by the document writer.

/// Duplex request, understood by level 1 `statusdict` and level 2 devices.
pub const DUPLEX_FEATURE: &str = "\
%%BeginFeature: *Duplex True
systemdict begin
  /languagelevel where
  { pop languagelevel } { 1 } ifelse
  2 ge { 1 dict dup /Duplex true put setpagedevice }
  { statusdict /setduplexmode known { statusdict begin true setduplexmode end } if
  } ifelse
end
%%EndFeature
";

/// Tumble (short-edge binding) request.
pub const TUMBLE_FEATURE: &str = "\
%%BeginFeature: *Tumble True
systemdict begin
  /languagelevel where
  { pop languagelevel } { 1 } ifelse
  2 ge { 1 dict dup /Tumble true put setpagedevice }
  { statusdict /settumble known { statusdict begin true settumble end } if
  } ifelse
end
%%EndFeature
";

/// Defines `rasterps_avoiddeadzone`, which shrinks the page into the
/// device's imageable area. Called at the start of every page.
pub const AVOID_DEAD_ZONE_FEATURE: &str = "\
%%BeginFeature: *AvoidDeadZone True
userdict /rasterps_avoiddeadzone {
  gsave newpath clippath pathbbox grestore
  4 2 roll 2 copy translate
  exch 3 1 roll sub 3 1 roll sub exch
  currentpagedevice /PageSize get aload pop
  exch 3 1 roll div 3 1 roll div abs exch abs
  2 copy gt { exch } if pop
  dup 1 lt { dup scale } { pop } ifelse
} bind put
%%EndFeature
";

/// Invocation of [`AVOID_DEAD_ZONE_FEATURE`].
pub const AVOID_DEAD_ZONE_CALL: &str = "rasterps_avoiddeadzone\n";

/// Clip to the unit square the image is drawn into.
pub const UNIT_CLIP: &str =
    "newpath 0 0 moveto 1 0 lineto 1 1 lineto 0 1 lineto closepath clip newpath\n";

/// Format a number the way PostScript reads it: integers without a
/// fraction, everything else with at most four decimals.
pub fn number(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{rounded:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Escape a string for use inside a DSC comment (single line, printable).
pub fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(number(612.0), "612");
        assert_eq!(number(-3.0), "-3");
        assert_eq!(number(0.5), "0.5");
        assert_eq!(number(72.0 / 300.0 * 100.0), "24");
        assert_eq!(number(1.0 / 3.0), "0.3333");
        assert_eq!(number(f64::NAN), "0");
    }

    #[test]
    fn comments_stay_on_one_line() {
        assert_eq!(comment_text("scan\n01.tif"), "scan?01.tif");
    }
}
