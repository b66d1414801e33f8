//! Error types for dut-expect.
//!
//! A failed expectation is reported as [`ExpectationTimeout`], whether the
//! deadline elapsed or the DUT output ended first; [`TimeoutCause`] tells
//! the two apart. Everything else that can go wrong around the matcher
//! (stream I/O, bad patterns, bad configuration) is an [`ExpectError`].

use std::fmt;
use std::time::Duration;

use dut_lines::LineError;
use serde::Serialize;
use thiserror::Error;

use crate::types::{MatchResult, millis};

/// Maximum number of observed lines rendered in an error message.
const MAX_DISPLAY_LINES: usize = 12;

/// Render the lines observed while waiting, keeping the most recent ones.
fn format_observed_snippet(observed: &[String]) -> String {
    if observed.is_empty() {
        return "(no lines observed)".to_string();
    }

    let total = observed.len();
    let header = format!("┌─ observed ({total} lines) ─────────────────────");
    let footer = "└────────────────────────────────────────";
    if total <= MAX_DISPLAY_LINES {
        return format!("{header}\n│ {}\n{footer}", observed.join("\n│ "));
    }

    let tail = &observed[total - MAX_DISPLAY_LINES..];
    format!(
        "{header}\n│ ... ({} lines hidden)\n│ {}\n{footer}",
        total - tail.len(),
        tail.join("\n│ ")
    )
}

fn format_label(pattern: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{name} ('{pattern}')"),
        None => format!("'{pattern}'"),
    }
}

fn format_hint(cause: TimeoutCause, dut_alive: bool) -> &'static str {
    match (cause, dut_alive) {
        (TimeoutCause::EndOfStream, _) => {
            "Tip: The DUT output ended before the pattern appeared. Check that the\n\
             firmware reached this point and did not reset or crash."
        }
        (TimeoutCause::Deadline, true) => {
            "Tip: The DUT is still running. Check that the pattern matches the log text\n\
             exactly (regex special chars may need escaping) and that the timeout is sufficient."
        }
        (TimeoutCause::Deadline, false) => {
            "Tip: The DUT stopped producing output while waiting for the pattern."
        }
    }
}

/// Why an expectation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutCause {
    /// The expectation's timeout elapsed.
    Deadline,
    /// The DUT output closed before a matching line arrived.
    EndOfStream,
}

impl fmt::Display for TimeoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deadline => f.write_str("deadline elapsed"),
            Self::EndOfStream => f.write_str("DUT output ended"),
        }
    }
}

/// An expectation's pattern did not appear before its deadline or before
/// the end of the DUT output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error(
    "expectation #{index} {} not matched: {cause} after {elapsed:?} (timeout {timeout:?})\n\
     \n\
     {}\n\
     \n\
     {}",
    format_label(pattern, name.as_deref()),
    format_observed_snippet(observed),
    format_hint(*cause, *dut_alive)
)]
pub struct ExpectationTimeout {
    /// Position of the failed expectation in the list.
    pub index: usize,

    /// The pattern that was not found.
    pub pattern: String,

    /// Optional label of the expectation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The timeout the expectation was given.
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Time spent waiting before failing.
    #[serde(rename = "elapsed_ms", with = "millis")]
    pub elapsed: Duration,

    /// Deadline or end-of-stream.
    pub cause: TimeoutCause,

    /// Whether the DUT could still deliver output at the time of failure.
    pub dut_alive: bool,

    /// Every line consumed since the previous successful match.
    pub observed: Vec<String>,
}

impl ExpectationTimeout {
    /// The `TimedOut` result recorded for the failed expectation.
    #[must_use]
    pub fn to_match_result(&self) -> MatchResult {
        MatchResult::TimedOut {
            index: self.index,
            pattern: self.pattern.clone(),
            elapsed: self.elapsed,
        }
    }

    /// Check if the failure was caused by the stream closing.
    #[must_use]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self.cause, TimeoutCause::EndOfStream)
    }
}

/// The main error type for dut-expect operations.
#[derive(Debug, Error)]
pub enum ExpectError {
    /// An expectation was not met.
    #[error(transparent)]
    Timeout(Box<ExpectationTimeout>),

    /// The DUT line source failed.
    #[error("DUT stream error: {0}")]
    Stream(#[from] LineError),

    /// An expectation list was empty.
    #[error("no expectations given; at least one is required")]
    NoExpectations,

    /// Invalid pattern specification.
    #[error("invalid pattern: {message}")]
    InvalidPattern {
        /// Description of what's wrong with the pattern.
        message: String,
    },

    /// Invalid regex pattern.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for dut-expect operations.
pub type Result<T> = std::result::Result<T, ExpectError>;

impl From<ExpectationTimeout> for ExpectError {
    fn from(err: ExpectationTimeout) -> Self {
        Self::Timeout(Box::new(err))
    }
}

impl ExpectError {
    /// Create an invalid pattern error.
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Check if this is an expectation failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this error came from the DUT line source.
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Get the expectation failure, if this is one.
    #[must_use]
    pub fn as_timeout(&self) -> Option<&ExpectationTimeout> {
        match self {
            Self::Timeout(err) => Some(err),
            _ => None,
        }
    }

    /// Take the expectation failure out of this error.
    ///
    /// Returns the original error unchanged if it is some other kind.
    pub fn into_timeout(self) -> std::result::Result<ExpectationTimeout, Self> {
        match self {
            Self::Timeout(err) => Ok(*err),
            other => Err(other),
        }
    }

    /// Lines observed before an expectation failed.
    #[must_use]
    pub fn observed(&self) -> Option<&[String]> {
        self.as_timeout().map(|err| err.observed.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(observed: Vec<String>, cause: TimeoutCause) -> ExpectationTimeout {
        ExpectationTimeout {
            index: 6,
            pattern: "NEC frame start---".into(),
            name: None,
            timeout: Duration::from_secs(30),
            elapsed: Duration::from_millis(1200),
            cause,
            dut_alive: false,
            observed,
        }
    }

    #[test]
    fn timeout_display_names_index_and_pattern() {
        let err = sample(
            vec!["I (400) main_task: Returned from app_main()".into()],
            TimeoutCause::EndOfStream,
        );
        let msg = err.to_string();
        assert!(msg.contains("expectation #6"));
        assert!(msg.contains("'NEC frame start---'"));
        assert!(msg.contains("DUT output ended"));
        assert!(msg.contains("│ I (400) main_task: Returned from app_main()"));
        assert!(msg.contains("Tip:"));
    }

    #[test]
    fn timeout_display_uses_name() {
        let mut err = sample(Vec::new(), TimeoutCause::Deadline);
        err.name = Some("frame".into());
        let msg = err.to_string();
        assert!(msg.contains("frame ('NEC frame start---')"));
        assert!(msg.contains("(no lines observed)"));
        assert!(msg.contains("deadline elapsed"));
    }

    #[test]
    fn long_observation_is_truncated() {
        let observed: Vec<String> = (0..40).map(|i| format!("{{0:{i}}},{{1:560}}")).collect();
        let msg = format_observed_snippet(&observed);
        assert!(msg.contains("observed (40 lines)"));
        assert!(msg.contains("(28 lines hidden)"));
        assert!(msg.contains("{0:39},{1:560}"));
        assert!(!msg.contains("{0:0},{1:560}"));
    }

    #[test]
    fn timeout_converts_to_result() {
        let err = sample(Vec::new(), TimeoutCause::Deadline);
        let result = err.to_match_result();
        assert!(!result.is_matched());
        assert_eq!(result.index(), 6);
    }

    #[test]
    fn expect_error_wraps_timeout() {
        let err: ExpectError = sample(vec!["a".into()], TimeoutCause::EndOfStream).into();
        assert!(err.is_timeout());
        assert_eq!(err.observed(), Some(&["a".to_string()][..]));
        assert!(err.as_timeout().is_some_and(ExpectationTimeout::is_end_of_stream));
        assert_eq!(err.into_timeout().map(|t| t.index).ok(), Some(6));
    }

    #[test]
    fn stream_error_from_line_error() {
        let err: ExpectError = LineError::Closed.into();
        assert!(err.is_stream());
        assert!(err.to_string().contains("line source has been closed"));
        assert!(err.into_timeout().is_err());
    }

    #[test]
    fn io_with_context_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ExpectError::io_context("reading scenario file", io_err);
        assert!(err.to_string().contains("reading scenario file"));
    }

    #[test]
    fn timeout_serializes_millis() {
        let err = sample(Vec::new(), TimeoutCause::EndOfStream);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["timeout_ms"], 30_000);
        assert_eq!(json["elapsed_ms"], 1_200);
        assert_eq!(json["cause"], "end_of_stream");
        assert!(json.get("name").is_none());
    }
}
