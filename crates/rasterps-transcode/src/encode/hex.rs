// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Streaming hex encoder: two uppercase digits per byte, fixed bytes per line.

use std::io::{self, Write};

/// Default number of input bytes per output line (72 characters).
pub const BYTES_PER_LINE: usize = 36;

/// Incremental hex encoder with a line-break countdown.
#[derive(Debug, Clone)]
pub struct HexEncoder {
    /// Bytes already written on the current line.
    line_used: usize,
    bytes_per_line: usize,
}

impl Default for HexEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HexEncoder {
    pub fn new() -> Self {
        Self::with_bytes_per_line(BYTES_PER_LINE)
    }

    pub fn with_bytes_per_line(bytes_per_line: usize) -> Self {
        Self {
            line_used: 0,
            bytes_per_line: bytes_per_line.max(1),
        }
    }

    pub fn encode<W: Write + ?Sized>(&mut self, out: &mut W, data: &[u8]) -> io::Result<()> {
        let mut text = Vec::with_capacity(data.len() * 2 + data.len() / self.bytes_per_line + 1);
        let mut rest = data;
        while !rest.is_empty() {
            let room = self.bytes_per_line - self.line_used;
            let take = room.min(rest.len());
            text.extend_from_slice(::hex::encode_upper(&rest[..take]).as_bytes());
            self.line_used += take;
            rest = &rest[take..];
            if self.line_used == self.bytes_per_line {
                text.push(b'\n');
                self.line_used = 0;
            }
        }
        out.write_all(&text)
    }

    /// Terminate the current line and, when `end_marker` is set, write the
    /// `>` that ends an `ASCIIHexDecode` stream.
    pub fn finish<W: Write + ?Sized>(&mut self, out: &mut W, end_marker: bool) -> io::Result<()> {
        if self.line_used > 0 {
            out.write_all(b"\n")?;
            self.line_used = 0;
        }
        if end_marker {
            out.write_all(b">\n")?;
        }
        Ok(())
    }
}
