//! Core traits for DUT line capture.
//!
//! This module defines [`LineSource`], the only capability the matcher needs
//! from a device-under-test: read the next line with a deadline, and report
//! whether more lines can still arrive.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Outcome of a single [`LineSource::read_line`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line, without its terminator.
    Line(String),

    /// The source closed; no further lines will arrive.
    EndOfStream,

    /// No line arrived within the requested timeout. The source may still be alive.
    TimedOut,
}

impl ReadOutcome {
    /// Get the line if this outcome carries one.
    #[must_use]
    pub fn into_line(self) -> Option<String> {
        match self {
            Self::Line(line) => Some(line),
            Self::EndOfStream | Self::TimedOut => None,
        }
    }

    /// Check if the source reached end-of-stream.
    #[must_use]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

/// A live, append-only stream of text lines produced by a DUT.
///
/// Implementations are consumed by exactly one reader at a time; holding
/// `&mut` to a source is holding the stream cursor.
pub trait LineSource: Send {
    /// Wait up to `timeout` for the next line.
    ///
    /// Returns [`ReadOutcome::TimedOut`] when nothing arrived in time and
    /// [`ReadOutcome::EndOfStream`] once the source is exhausted. Errors are
    /// reserved for I/O failures of the underlying transport.
    fn read_line(&mut self, timeout: Duration) -> impl Future<Output = Result<ReadOutcome>> + Send;

    /// Check whether the producer can still deliver lines.
    fn is_alive(&self) -> bool;
}

impl<S: LineSource> LineSource for &mut S {
    fn read_line(&mut self, timeout: Duration) -> impl Future<Output = Result<ReadOutcome>> + Send {
        (**self).read_line(timeout)
    }

    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }
}
