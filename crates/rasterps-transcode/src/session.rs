// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transcoding session — the output sink plus everything that changes while
// one document is written: document state, page and image counters, the open
// text-encoder stream and the reusable chunk buffer.

use std::io::Write;

use rasterps_core::config::TranscodeOptions;
use rasterps_core::error::{Result, TranscodeError};
use tracing::{debug, warn};

use crate::encode::{Ascii85Encoder, HexEncoder, TextEncoding};

/// Where the document is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Unopened,
    PrologWritten,
    PageOpen,
    PageClosed,
    TrailerWritten,
}

/// Mutable state of one output document. Owned by the document writer.
pub struct TranscodeSession<W: Write> {
    options: TranscodeOptions,
    sink: W,
    state: DocumentState,
    pages_emitted: u32,
    images_seen: usize,
    ascii85: Ascii85Encoder,
    hex: HexEncoder,
    /// Encoding of the data stream currently open, if any.
    open_stream: Option<TextEncoding>,
    scratch: Vec<u8>,
}

impl<W: Write> TranscodeSession<W> {
    // -- Construction ---------------------------------------------------------

    pub fn new(sink: W, options: TranscodeOptions) -> Self {
        if options.ascii85 && !options.level.has_filters() {
            warn!("ASCII85 is not available at level 1, using hex");
        }
        debug!(
            level = options.level.number(),
            ascii85 = options.uses_ascii85(),
            eps = options.eps,
            "transcode session created"
        );
        Self {
            options,
            sink,
            state: DocumentState::Unopened,
            pages_emitted: 0,
            images_seen: 0,
            ascii85: Ascii85Encoder::new(),
            hex: HexEncoder::new(),
            open_stream: None,
            scratch: Vec::new(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn pages_emitted(&self) -> u32 {
        self.pages_emitted
    }

    pub fn images_seen(&self) -> usize {
        self.images_seen
    }

    pub fn has_open_stream(&self) -> bool {
        self.open_stream.is_some()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    // -- State ----------------------------------------------------------------

    pub(crate) fn set_state(&mut self, state: DocumentState) {
        self.state = state;
    }

    /// Count a new page and return its 1-based number.
    pub(crate) fn next_page(&mut self) -> u32 {
        self.pages_emitted += 1;
        self.pages_emitted
    }

    /// Count a new image and return its 0-based index.
    pub(crate) fn next_image(&mut self) -> usize {
        let index = self.images_seen;
        self.images_seen += 1;
        index
    }

    // -- Output ---------------------------------------------------------------

    pub(crate) fn write_str(&mut self, text: &str) -> Result<()> {
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Feed bytes to the data stream, opening it if needed.
    pub(crate) fn write_data(&mut self, encoding: TextEncoding, data: &[u8]) -> Result<()> {
        self.open_stream = Some(encoding);
        match encoding {
            TextEncoding::Ascii85 => self.ascii85.encode(&mut self.sink, data)?,
            TextEncoding::Hex => self.hex.encode(&mut self.sink, data)?,
        }
        Ok(())
    }

    /// Close the data stream. ASCII85 always ends with `~>`; hex ends with
    /// `>` only where `ASCIIHexDecode` reads it (level 2 and up).
    pub(crate) fn finish_data(&mut self, encoding: TextEncoding) -> Result<()> {
        match encoding {
            TextEncoding::Ascii85 => self.ascii85.finish(&mut self.sink)?,
            TextEncoding::Hex => {
                let end_marker = self.options.level.has_filters();
                self.hex.finish(&mut self.sink, end_marker)?;
            }
        }
        self.open_stream = None;
        Ok(())
    }

    /// Close whatever data stream is open after a failure.
    pub(crate) fn abandon_data(&mut self) -> Result<()> {
        match self.open_stream {
            Some(encoding) => self.finish_data(encoding),
            None => Ok(()),
        }
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    // -- Scratch buffer -------------------------------------------------------

    /// Borrow the scratch buffer, zero-filled to `len` bytes. Capacity is kept
    /// across chunks; growth that cannot be satisfied is an
    /// `AllocationFailure` instead of an abort.
    pub(crate) fn take_scratch(&mut self, len: u64) -> Result<Vec<u8>> {
        let requested = usize::try_from(len).map_err(|_| TranscodeError::AllocationFailure {
            requested: usize::MAX,
        })?;
        let mut buf = std::mem::take(&mut self.scratch);
        buf.clear();
        if buf.capacity() < requested {
            buf.try_reserve(requested)
                .map_err(|_| TranscodeError::AllocationFailure { requested })?;
            debug!(capacity = buf.capacity(), "grew chunk buffer");
        }
        buf.resize(requested, 0);
        Ok(buf)
    }

    /// Hand the scratch buffer back for reuse.
    pub(crate) fn return_scratch(&mut self, buf: Vec<u8>) {
        if buf.capacity() >= self.scratch.capacity() {
            self.scratch = buf;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterps_core::types::OutputLevel;

    fn session(level: OutputLevel, ascii85: bool) -> TranscodeSession<Vec<u8>> {
        TranscodeSession::new(
            Vec::new(),
            TranscodeOptions {
                level,
                ascii85,
                ..TranscodeOptions::default()
            },
        )
    }

    #[test]
    fn counters_start_at_zero() {
        let mut s = session(OutputLevel::Level2, true);
        assert_eq!(s.state(), DocumentState::Unopened);
        assert_eq!(s.next_image(), 0);
        assert_eq!(s.next_image(), 1);
        assert_eq!(s.next_page(), 1);
        assert_eq!(s.pages_emitted(), 1);
    }

    #[test]
    fn hex_end_marker_depends_on_level() {
        let mut s = session(OutputLevel::Level2, false);
        s.write_data(TextEncoding::Hex, &[0xab]).unwrap();
        assert!(s.has_open_stream());
        s.finish_data(TextEncoding::Hex).unwrap();
        assert!(!s.has_open_stream());
        assert_eq!(s.into_inner(), b"AB\n>\n");

        let mut s = session(OutputLevel::Level1, false);
        s.write_data(TextEncoding::Hex, &[0xab]).unwrap();
        s.finish_data(TextEncoding::Hex).unwrap();
        assert_eq!(s.into_inner(), b"AB\n");
    }

    #[test]
    fn abandon_closes_open_stream_only() {
        let mut s = session(OutputLevel::Level2, true);
        s.abandon_data().unwrap();
        s.write_data(TextEncoding::Ascii85, &[0, 0, 0, 0, 1]).unwrap();
        s.abandon_data().unwrap();
        let out = String::from_utf8(s.into_inner()).unwrap();
        assert!(out.starts_with('z'));
        assert!(out.ends_with("~>\n"));
    }

    #[test]
    fn scratch_is_reused() {
        let mut s = session(OutputLevel::Level2, true);
        let buf = s.take_scratch(1024).unwrap();
        assert_eq!(buf.len(), 1024);
        let capacity = buf.capacity();
        s.return_scratch(buf);
        let buf = s.take_scratch(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn impossible_scratch_is_an_allocation_failure() {
        let mut s = session(OutputLevel::Level2, true);
        let err = s.take_scratch(u64::MAX / 2).unwrap_err();
        assert!(matches!(err, TranscodeError::AllocationFailure { .. }));
    }
}
