// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Streaming ASCII85 (base-85) encoder.
//
// Every 4 input bytes become 5 characters in `!`..`u`; an all-zero group is
// written as the single character `z`. Lines are broken between groups so no
// line exceeds the character budget. The stream ends with `~>`.

use std::io::{self, Write};

/// Default maximum characters per output line.
pub const LINE_BUDGET: usize = 72;

/// Incremental ASCII85 encoder. State survives across [`encode`] calls until
/// [`finish`] closes the stream.
///
/// [`encode`]: Ascii85Encoder::encode
/// [`finish`]: Ascii85Encoder::finish
#[derive(Debug, Clone)]
pub struct Ascii85Encoder {
    /// Pending bytes of the current 4-byte group.
    group: [u8; 4],
    /// How many bytes of `group` are filled.
    filled: usize,
    /// Characters already on the current output line.
    line_used: usize,
    line_budget: usize,
}

impl Default for Ascii85Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Ascii85Encoder {
    pub fn new() -> Self {
        Self::with_line_budget(LINE_BUDGET)
    }

    /// Budgets below 5 still put one group per line.
    pub fn with_line_budget(line_budget: usize) -> Self {
        Self {
            group: [0; 4],
            filled: 0,
            line_used: 0,
            line_budget: line_budget.max(5),
        }
    }

    /// Bytes buffered but not yet written.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Feed `data`, writing every completed group.
    pub fn encode<W: Write + ?Sized>(&mut self, out: &mut W, data: &[u8]) -> io::Result<()> {
        let mut text = Vec::with_capacity(data.len() / 4 * 5 + data.len() / self.line_budget + 8);
        for &byte in data {
            self.group[self.filled] = byte;
            self.filled += 1;
            if self.filled == 4 {
                let word = u32::from_be_bytes(self.group);
                if word == 0 {
                    self.put(&mut text, b"z");
                } else {
                    self.put(&mut text, &digits(word));
                }
                self.filled = 0;
            }
        }
        out.write_all(&text)
    }

    /// Flush the partial group and write the `~>` end-of-data marker.
    ///
    /// A partial group of `n` bytes is zero-padded and written as its first
    /// `n + 1` characters; the `z` shorthand never applies to it.
    pub fn finish<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        let mut text = Vec::with_capacity(10);
        if self.filled > 0 {
            let mut padded = [0u8; 4];
            padded[..self.filled].copy_from_slice(&self.group[..self.filled]);
            let encoded = digits(u32::from_be_bytes(padded));
            self.put(&mut text, &encoded[..self.filled + 1]);
        }
        self.put(&mut text, b"~>");
        text.push(b'\n');
        self.filled = 0;
        self.line_used = 0;
        out.write_all(&text)
    }

    fn put(&mut self, text: &mut Vec<u8>, chars: &[u8]) {
        if self.line_used + chars.len() > self.line_budget {
            text.push(b'\n');
            self.line_used = 0;
        }
        text.extend_from_slice(chars);
        self.line_used += chars.len();
    }
}

/// The five base-85 digits of a big-endian word.
fn digits(mut word: u32) -> [u8; 5] {
    let mut out = [0u8; 5];
    for slot in out.iter_mut().rev() {
        *slot = (word % 85) as u8 + b'!';
        word /= 85;
    }
    out
}

/// Encode a complete buffer, end marker included.
pub fn encode_to_vec(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 5 / 4 + 16);
    let mut encoder = Ascii85Encoder::new();
    // Writing into a Vec cannot fail.
    let _ = encoder.encode(&mut out, data);
    let _ = encoder.finish(&mut out);
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Reference decoder for round-trip checks.
    pub(crate) fn decode(text: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut group = Vec::with_capacity(5);
        for &c in text {
            match c {
                b'~' => break,
                b'z' if group.is_empty() => out.extend_from_slice(&[0, 0, 0, 0]),
                b'!'..=b'u' => {
                    group.push(c - b'!');
                    if group.len() == 5 {
                        let word = group.iter().fold(0u32, |acc, &d| acc * 85 + d as u32);
                        out.extend_from_slice(&word.to_be_bytes());
                        group.clear();
                    }
                }
                c if c.is_ascii_whitespace() => {}
                other => panic!("unexpected character {other:#x} in ASCII85 text"),
            }
        }
        if !group.is_empty() {
            let n = group.len();
            while group.len() < 5 {
                group.push(84);
            }
            let word = group.iter().fold(0u32, |acc, &d| acc * 85 + d as u32);
            out.extend_from_slice(&word.to_be_bytes()[..n - 1]);
        }
        out
    }

    #[test]
    fn known_vector() {
        // "Man " is the canonical example: 9jqo^
        assert_eq!(encode_to_vec(b"Man "), b"9jqo^~>\n");
    }

    #[test]
    fn zero_group_uses_shorthand() {
        assert_eq!(encode_to_vec(&[0, 0, 0, 0, 0, 0, 0, 0]), b"zz~>\n");
    }

    #[test]
    fn partial_zero_group_is_spelled_out() {
        assert_eq!(encode_to_vec(&[0, 0]), b"!!!~>\n");
    }

    #[test]
    fn empty_stream_is_just_the_marker() {
        assert_eq!(encode_to_vec(&[]), b"~>\n");
    }

    #[test]
    fn round_trip_every_remainder() {
        for len in 0..=13usize {
            let data: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(73).wrapping_add(11)).collect();
            assert_eq!(decode(&encode_to_vec(&data)), data, "length {len}");
        }
    }

    #[test]
    fn round_trip_zero_runs() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(&[1, 2, 3]);
        data.extend_from_slice(&[0; 4]);
        data.push(0);
        let text = encode_to_vec(&data);
        assert_eq!(text.iter().filter(|&&c| c == b'z').count(), 5);
        assert_eq!(decode(&text), data);
    }

    #[test]
    fn incremental_matches_one_shot() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1001).collect();
        let mut out = Vec::new();
        let mut encoder = Ascii85Encoder::new();
        for piece in data.chunks(7) {
            encoder.encode(&mut out, piece).unwrap();
        }
        encoder.finish(&mut out).unwrap();
        assert_eq!(out, encode_to_vec(&data));
    }

    #[test]
    fn lines_respect_the_budget() {
        let data: Vec<u8> = (1..=255u8).cycle().take(4000).collect();
        let text = encode_to_vec(&data);
        for line in text.split(|&c| c == b'\n') {
            assert!(line.len() <= LINE_BUDGET, "line of {} chars", line.len());
        }
        assert_eq!(decode(&text), data);
    }
}
