//! Error types for the dut-lines crate.
//!
//! This module provides a unified error type [`LineError`] that covers the
//! failure modes of capturing lines from a device-under-test.

use std::io;

/// The error type for line capture operations.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// Failed to spawn the monitor process.
    #[error("failed to spawn monitor process `{program}`: {source}")]
    Spawn {
        /// The program that could not be started.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred while reading DUT output.
    #[error("DUT output I/O error: {0}")]
    Io(#[from] io::Error),

    /// The spawned process did not expose the expected pipe.
    #[error("monitor process has no {0} pipe")]
    MissingPipe(&'static str),

    /// The line source has been closed by its owner.
    #[error("line source has been closed")]
    Closed,
}

impl LineError {
    /// Create a spawn error for the given program.
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Check if this error came from the underlying reader.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// A specialized Result type for line capture operations.
pub type Result<T> = std::result::Result<T, LineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LineError::Closed;
        assert_eq!(err.to_string(), "line source has been closed");
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "serial unplugged");
        let err: LineError = io_err.into();
        assert!(err.is_io());
        assert!(err.to_string().contains("serial unplugged"));
    }

    #[test]
    fn spawn_error_names_program() {
        let err = LineError::spawn(
            "idf.py",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("idf.py"));
        assert!(!err.is_io());
    }
}
