// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-safe encodings for binary image data.

pub mod ascii85;
pub mod hex;

pub use ascii85::Ascii85Encoder;
pub use hex::HexEncoder;

/// Text encoding applied to a data stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii85,
    Hex,
}

impl TextEncoding {
    /// The PostScript filter that undoes this encoding.
    pub fn decode_filter(&self) -> &'static str {
        match self {
            Self::Ascii85 => "/ASCII85Decode",
            Self::Hex => "/ASCIIHexDecode",
        }
    }
}
