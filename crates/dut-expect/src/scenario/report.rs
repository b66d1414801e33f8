//! Scenario reports.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::{ExpectError, ExpectationTimeout, Result};
use crate::types::{MatchResult, Verdict, millis};

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,

    /// Pass if every expectation matched.
    pub verdict: Verdict,

    /// Number of expectations in the scenario.
    pub expected: usize,

    /// One result per attempted expectation, in order. A failed run ends
    /// with the `TimedOut` result of the failed expectation.
    pub results: Vec<MatchResult>,

    /// Details of the failed expectation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExpectationTimeout>,

    /// Wall time for the whole run.
    #[serde(rename = "elapsed_ms", with = "millis")]
    pub elapsed: Duration,
}

impl ScenarioReport {
    /// Check if the scenario passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Number of expectations that matched.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_matched()).count()
    }

    /// Serialize to a single line of JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ExpectError::config(format!("serializing report: {e}")))
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExpectError::config(format!("serializing report: {e}")))
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} ({}/{} matched in {:?})",
            self.scenario,
            self.verdict,
            self.matched_count(),
            self.expected,
            self.elapsed
        )?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        let skipped = self.expected.saturating_sub(self.results.len());
        if skipped > 0 {
            writeln!(f, "  ({skipped} not attempted)")?;
        }
        if let Some(failure) = &self.failure {
            writeln!(f)?;
            writeln!(f, "{failure}")?;
        }
        Ok(())
    }
}
