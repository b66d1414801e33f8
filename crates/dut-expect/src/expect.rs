//! Expectations and the sequential matcher.
//!
//! This module provides the pattern types, the [`Expectation`] that pairs a
//! pattern with an optional timeout, and the [`SequentialMatcher`] that
//! checks an ordered list of them against a DUT line stream.

mod expectation;
mod matcher;
mod pattern;

pub use expectation::Expectation;
pub use matcher::{MatchState, SequentialMatcher};
pub use pattern::{CompiledRegex, Pattern, PatternKind, PatternMatch};

use dut_lines::LineSource;

use crate::error::Result;
use crate::types::MatchResult;

/// Match `expectations` in order against `stream` with the default configuration.
///
/// Shorthand for [`SequentialMatcher::expect_all`] on a default matcher.
///
/// # Errors
///
/// See [`SequentialMatcher::expect_all`].
pub async fn expect_all<S: LineSource>(
    stream: &mut S,
    expectations: &[Expectation],
) -> Result<Vec<MatchResult>> {
    SequentialMatcher::new().expect_all(stream, expectations).await
}
