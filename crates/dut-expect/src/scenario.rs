//! Named expectation lists and their pass/fail reports.
//!
//! A [`Scenario`] bundles an ordered, non-empty expectation list with an
//! optional scenario-wide default timeout. [`ScenarioRunner`] drives it
//! against a DUT stream and folds a failed expectation into a
//! [`ScenarioReport`] instead of returning it as an error, so callers get
//! the matches that preceded the failure along with its diagnostics.
//!
//! # Example
//!
//! ```
//! use dut_expect::mock::ir_nec_mock;
//! use dut_expect::scenario::{ScenarioRunner, builtin};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> dut_expect::Result<()> {
//! let scenario = builtin::ir_nec_transceiver();
//! let report = ScenarioRunner::new().run(&scenario, &mut ir_nec_mock()).await?;
//! assert!(report.is_pass());
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod report;

use std::path::Path;
use std::time::Duration;

use dut_lines::LineSource;
use tokio::time::Instant;

use crate::config::{MatcherConfig, ScenarioFile};
use crate::error::{ExpectError, Result};
use crate::expect::{Expectation, SequentialMatcher};
use crate::types::Verdict;

pub use report::ScenarioReport;

/// A named, ordered, non-empty list of expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    expectations: Vec<Expectation>,
    default_timeout: Option<Duration>,
}

impl Scenario {
    /// Create a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::NoExpectations`] if `expectations` is empty.
    pub fn new(name: impl Into<String>, expectations: Vec<Expectation>) -> Result<Self> {
        if expectations.is_empty() {
            return Err(ExpectError::NoExpectations);
        }
        Ok(Self::from_static(name, expectations))
    }

    /// Build from a list already known to be non-empty.
    pub(crate) fn from_static(name: impl Into<String>, expectations: Vec<Expectation>) -> Self {
        debug_assert!(!expectations.is_empty());
        Self {
            name: name.into(),
            expectations,
            default_timeout: None,
        }
    }

    /// Load a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read and a configuration
    /// or pattern error if its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        ScenarioFile::load(path)?.into_scenario()
    }

    /// Parse a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration or pattern error if the text is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        ScenarioFile::from_toml_str(text)?.into_scenario()
    }

    /// Use `timeout` for expectations that do not set their own.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// The scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expectations, in order.
    #[must_use]
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// The scenario-wide default timeout, if set.
    #[must_use]
    pub const fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Number of expectations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    /// Always false; scenarios hold at least one expectation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }
}

/// Runs scenarios and produces reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioRunner {
    config: MatcherConfig,
}

impl ScenarioRunner {
    /// Create a runner with the default matcher configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with the given matcher configuration.
    ///
    /// A scenario's own default timeout takes precedence over
    /// `config.default_timeout`.
    #[must_use]
    pub const fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Run `scenario` against `stream`.
    ///
    /// A failed expectation produces a report with verdict
    /// [`Verdict::Fail`]; it is not returned as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::Stream`] if the line source fails.
    pub async fn run<S>(&self, scenario: &Scenario, stream: &mut S) -> Result<ScenarioReport>
    where
        S: LineSource,
    {
        let mut config = self.config;
        if let Some(timeout) = scenario.default_timeout {
            config.default_timeout = timeout;
        }

        tracing::info!(
            scenario = %scenario.name,
            expectations = scenario.len(),
            "running scenario"
        );

        let started = Instant::now();
        let mut results = Vec::with_capacity(scenario.len());
        let outcome = SequentialMatcher::with_config(config)
            .run_into(stream, &scenario.expectations, &mut results)
            .await;

        let failure = match outcome {
            Ok(()) => None,
            Err(err) => {
                let failure = err.into_timeout()?;
                results.push(failure.to_match_result());
                Some(failure)
            }
        };

        let report = ScenarioReport {
            scenario: scenario.name.clone(),
            verdict: if failure.is_none() { Verdict::Pass } else { Verdict::Fail },
            expected: scenario.len(),
            results,
            failure,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            scenario = %report.scenario,
            verdict = %report.verdict,
            matched = report.matched_count(),
            elapsed_ms = report.elapsed.as_millis(),
            "scenario finished"
        );

        Ok(report)
    }
}
