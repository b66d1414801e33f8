//! Byte stream to line splitting.
//!
//! [`LineSplitter`] accumulates raw bytes from a serial or process stream
//! and yields complete lines as they appear. It is transport-agnostic and
//! does no I/O itself; [`crate::LineReader`] drives it from a background task.

use bytes::BytesMut;

use crate::ansi::strip_ansi;
use crate::config::ReaderConfig;

/// Incremental line splitter.
#[derive(Debug)]
pub struct LineSplitter {
    /// Bytes received after the last complete line.
    pending: BytesMut,
    /// Maximum bytes per emitted line.
    max_line_len: usize,
    /// Whether ANSI escape sequences are removed.
    strip_ansi: bool,
}

impl LineSplitter {
    /// Create a splitter from a reader configuration.
    #[must_use]
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            pending: BytesMut::with_capacity(config.read_chunk),
            max_line_len: config.max_line_len.max(1),
            strip_ansi: config.strip_ansi,
        }
    }

    /// Feed bytes and collect every line they complete.
    ///
    /// Lines are terminated by `\n`; a trailing `\r` is removed. Data that
    /// exceeds the maximum line length without a terminator is emitted in
    /// chunks of at most that length, cut on a character boundary and never
    /// between the `\r` and `\n` of a line ending.
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(data);

        let mut lines = Vec::new();
        loop {
            if let Some(pos) = memchr::memchr(b'\n', &self.pending) {
                let body = body_len(&self.pending[..pos]);
                if body <= self.max_line_len {
                    let raw = self.pending.split_to(pos + 1);
                    lines.push(self.decode(&raw[..body]));
                    continue;
                }
            } else if self.pending.len() == self.max_line_len + 1
                && self.pending.last() == Some(&b'\r')
            {
                // The matching `\n` may be in the next read.
                break;
            }

            if self.pending.len() <= self.max_line_len {
                break;
            }
            let raw = self.pending.split_to(self.cut_point());
            lines.push(self.decode(&raw));
        }
        lines
    }

    /// Flush an unterminated trailing line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = self.pending.split();
        Some(self.decode(&raw[..body_len(&raw)]))
    }

    /// Number of buffered bytes not yet part of a complete line.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Where to cut an overlong line: the maximum length, backed off to the
    /// start of a UTF-8 sequence.
    fn cut_point(&self) -> usize {
        let max = self.max_line_len;
        (max.saturating_sub(3)..=max)
            .rev()
            .find(|&i| i > 0 && !is_continuation(self.pending[i]))
            .unwrap_or(max)
    }

    fn decode(&self, raw: &[u8]) -> String {
        let text = String::from_utf8_lossy(raw);
        if self.strip_ansi {
            strip_ansi(&text).into_owned()
        } else {
            text.into_owned()
        }
    }
}

/// Length of a line without its trailing `\r`.
fn body_len(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}

const fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}
