//! Sequential expectation matcher.
//!
//! The matcher walks an ordered list of expectations against a live
//! [`LineSource`]. Each expectation gets a fresh deadline; lines that do not
//! match the current expectation are consumed and dropped, so there is no
//! lookback. The first expectation that times out, or finds the stream
//! closed, ends the run.

use std::collections::VecDeque;

use dut_lines::{LineSource, ReadOutcome};

use super::expectation::Expectation;
use crate::config::MatcherConfig;
use crate::error::{ExpectError, ExpectationTimeout, Result, TimeoutCause};
use crate::types::MatchResult;
use crate::util::Deadline;

/// Progress through an expectation list.
///
/// `Waiting(i)` moves to `Matched(i)` on a hit and to `Failed(i)` on
/// deadline or end-of-stream. `Matched(i)` advances to `Waiting(i + 1)`
/// until the last expectation has matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Reading lines for expectation `i`.
    Waiting(usize),
    /// Expectation `i` matched.
    Matched(usize),
    /// Expectation `i` failed; terminal.
    Failed(usize),
}

impl MatchState {
    /// The expectation index this state refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Waiting(i) | Self::Matched(i) | Self::Failed(i) => i,
        }
    }

    /// Record a hit.
    #[must_use]
    pub const fn on_match(self) -> Self {
        match self {
            Self::Waiting(i) => Self::Matched(i),
            other => other,
        }
    }

    /// Record a deadline or end-of-stream.
    #[must_use]
    pub const fn on_failure(self) -> Self {
        match self {
            Self::Waiting(i) => Self::Failed(i),
            other => other,
        }
    }

    /// Move past a matched expectation, or stay put if `total` is reached.
    #[must_use]
    pub const fn advance(self, total: usize) -> Self {
        match self {
            Self::Matched(i) if i + 1 < total => Self::Waiting(i + 1),
            other => other,
        }
    }

    /// Check if no further transitions are possible for a list of `total`.
    #[must_use]
    pub const fn is_terminal(self, total: usize) -> bool {
        match self {
            Self::Failed(_) => true,
            Self::Matched(i) => i + 1 >= total,
            Self::Waiting(_) => false,
        }
    }
}

/// Lines consumed while waiting, kept for the failure report.
#[derive(Debug)]
struct ObservedLines {
    lines: VecDeque<String>,
    cap: Option<usize>,
}

impl ObservedLines {
    fn new(cap: Option<usize>) -> Self {
        Self {
            lines: VecDeque::new(),
            cap,
        }
    }

    fn push(&mut self, line: String) {
        if self.cap == Some(0) {
            return;
        }
        if self.cap.is_some_and(|cap| self.lines.len() >= cap) {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn into_vec(self) -> Vec<String> {
        self.lines.into()
    }
}

/// Matches an ordered list of expectations against a DUT line stream.
///
/// # Example
///
/// ```
/// use dut_expect::{Expectation, SequentialMatcher};
/// use dut_expect::mock::MockBuilder;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> dut_expect::Result<()> {
/// let mut dut = MockBuilder::new()
///     .line("I (312) IR_main: create RMT RX channel")
///     .line("I (322) IR_main: register RX done callback")
///     .eof()
///     .build();
///
/// let results = SequentialMatcher::new()
///     .expect_all(
///         &mut dut,
///         &[
///             Expectation::literal("IR_main: create RMT RX channel"),
///             Expectation::literal("IR_main: register RX done callback"),
///         ],
///     )
///     .await?;
///
/// assert_eq!(results.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialMatcher {
    config: MatcherConfig,
}

impl SequentialMatcher {
    /// Create a matcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with the given configuration.
    #[must_use]
    pub const fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// The matcher's configuration.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match every expectation in order.
    ///
    /// Returns one `Matched` result per expectation, in order.
    ///
    /// # Errors
    ///
    /// - [`ExpectError::NoExpectations`] if `expectations` is empty; the
    ///   stream is not touched.
    /// - [`ExpectError::Timeout`] for the first expectation that was not
    ///   met. Later expectations are not attempted.
    /// - [`ExpectError::Stream`] if the line source fails.
    pub async fn expect_all<S>(
        &self,
        stream: &mut S,
        expectations: &[Expectation],
    ) -> Result<Vec<MatchResult>>
    where
        S: LineSource,
    {
        let mut results = Vec::with_capacity(expectations.len());
        self.run_into(stream, expectations, &mut results).await?;
        Ok(results)
    }

    /// Match a single expectation, reporting it as index 0.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::Timeout`] if the expectation is not met and
    /// [`ExpectError::Stream`] if the line source fails.
    pub async fn expect_one<S>(
        &self,
        stream: &mut S,
        expectation: &Expectation,
    ) -> Result<MatchResult>
    where
        S: LineSource,
    {
        self.await_expectation(stream, 0, expectation).await
    }

    /// Drive the state machine, pushing each `Matched` result as it happens.
    ///
    /// On failure `results` holds the matches that preceded it.
    pub(crate) async fn run_into<S>(
        &self,
        stream: &mut S,
        expectations: &[Expectation],
        results: &mut Vec<MatchResult>,
    ) -> Result<()>
    where
        S: LineSource,
    {
        let total = expectations.len();
        if total == 0 {
            return Err(ExpectError::NoExpectations);
        }

        tracing::debug!(expectations = total, "starting expectation sequence");

        let mut state = MatchState::Waiting(0);
        while !state.is_terminal(total) {
            let MatchState::Waiting(index) = state else {
                state = state.advance(total);
                continue;
            };

            match self.await_expectation(stream, index, &expectations[index]).await {
                Ok(result) => {
                    results.push(result);
                    state = state.on_match();
                }
                Err(err) => {
                    state = state.on_failure();
                    tracing::debug!(?state, "expectation sequence stopped");
                    return Err(err);
                }
            }
        }

        tracing::debug!(expectations = total, "all expectations matched");
        Ok(())
    }

    /// Read lines until `expectation` matches, its deadline passes or the
    /// stream ends.
    async fn await_expectation<S>(
        &self,
        stream: &mut S,
        index: usize,
        expectation: &Expectation,
    ) -> Result<MatchResult>
    where
        S: LineSource,
    {
        let timeout = expectation.effective_timeout(self.config.default_timeout);
        let deadline = Deadline::from_now(timeout);
        let mut observed = ObservedLines::new(self.config.max_diagnostic_lines);
        let pattern = expectation.pattern();

        tracing::trace!(
            index,
            pattern = %pattern,
            timeout_ms = timeout.as_millis(),
            "waiting for expectation"
        );

        let cause = loop {
            match stream.read_line(deadline.remaining()).await? {
                ReadOutcome::Line(line) => {
                    if let Some(m) = pattern.matches(&line) {
                        let elapsed = deadline.elapsed();
                        tracing::debug!(
                            index,
                            pattern = %pattern,
                            elapsed_ms = elapsed.as_millis(),
                            "expectation matched"
                        );
                        return Ok(MatchResult::Matched {
                            index,
                            pattern: pattern.as_str().to_string(),
                            line,
                            elapsed,
                            captures: m.captures,
                        });
                    }

                    tracing::trace!(index, line = %line, "line skipped");
                    observed.push(line);

                    // A chatty DUT must not keep an expectation alive forever.
                    if deadline.is_expired() {
                        break TimeoutCause::Deadline;
                    }
                }
                ReadOutcome::TimedOut => break TimeoutCause::Deadline,
                ReadOutcome::EndOfStream => break TimeoutCause::EndOfStream,
            }
        };

        let failure = ExpectationTimeout {
            index,
            pattern: pattern.as_str().to_string(),
            name: expectation.name().map(str::to_string),
            timeout,
            elapsed: deadline.elapsed(),
            cause,
            dut_alive: stream.is_alive(),
            observed: observed.into_vec(),
        };

        tracing::warn!(
            index,
            pattern = %pattern,
            cause = %cause,
            elapsed_ms = failure.elapsed.as_millis(),
            observed = failure.observed.len(),
            "expectation not met"
        );

        Err(failure.into())
    }
}
