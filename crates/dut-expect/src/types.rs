//! Common types for dut-expect.
//!
//! This module defines the per-expectation [`MatchResult`] and the
//! scenario-wide [`Verdict`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Terminal outcome of a single expectation.
///
/// Produced exactly once per expectation that was attempted and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// A line matched the expectation's pattern.
    Matched {
        /// Position of the expectation in the list.
        index: usize,
        /// The pattern that matched.
        pattern: String,
        /// The full line that matched.
        line: String,
        /// Time from the start of this expectation to the match.
        #[serde(rename = "elapsed_ms", with = "millis")]
        elapsed: Duration,
        /// Regex capture groups, empty for literal and glob patterns. A group
        /// that did not take part in the match is `None`.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        captures: Vec<Option<String>>,
    },

    /// The expectation failed by deadline or end-of-stream.
    TimedOut {
        /// Position of the expectation in the list.
        index: usize,
        /// The pattern that was not found.
        pattern: String,
        /// Time spent waiting.
        #[serde(rename = "elapsed_ms", with = "millis")]
        elapsed: Duration,
    },
}

impl MatchResult {
    /// Check if the expectation matched.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Position of the expectation in the list.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Matched { index, .. } | Self::TimedOut { index, .. } => *index,
        }
    }

    /// The expectation's pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Matched { pattern, .. } | Self::TimedOut { pattern, .. } => pattern,
        }
    }

    /// Time spent on this expectation.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Matched { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    /// The matched line, if any.
    #[must_use]
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::Matched { line, .. } => Some(line),
            Self::TimedOut { .. } => None,
        }
    }

    /// Get a capture group by index, `None` if it did not take part.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        match self {
            Self::Matched { captures, .. } => captures.get(index)?.as_deref(),
            Self::TimedOut { .. } => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched {
                index,
                line,
                elapsed,
                ..
            } => write!(f, "[{index}] matched after {elapsed:?}: {line}"),
            Self::TimedOut {
                index,
                pattern,
                elapsed,
            } => write!(f, "[{index}] timed out after {elapsed:?}: '{pattern}'"),
        }
    }
}

/// Pass/fail verdict for a whole scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every expectation matched.
    Pass,
    /// An expectation failed.
    Fail,
}

impl Verdict {
    /// Check if this verdict is a pass.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// Serialize a `Duration` as whole milliseconds.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}
