//! Scenario file loading.
//!
//! Scenarios can be kept next to the firmware as TOML:
//!
//! ```toml
//! name = "ir_nec_transceiver"
//! default_timeout_ms = 30000
//!
//! [[expect]]
//! pattern = "IR_main: create RMT RX channel"
//!
//! [[expect]]
//! pattern = 'Address=[0-9A-F]{4}'
//! kind = "regex"
//! timeout_ms = 5000
//! name = "decoded frame"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ExpectError, Result};
use crate::expect::{Expectation, Pattern, PatternKind};
use crate::scenario::Scenario;

/// One `[[expect]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectationSpec {
    /// Pattern text.
    pub pattern: String,

    /// How `pattern` is interpreted.
    #[serde(default)]
    pub kind: PatternKind,

    /// Per-expectation timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Label used in logs and reports.
    #[serde(default)]
    pub name: Option<String>,
}

impl ExpectationSpec {
    /// Compile into an [`Expectation`].
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::InvalidPattern`] if the pattern does not compile.
    pub fn to_expectation(&self) -> Result<Expectation> {
        let pattern = Pattern::from_kind(self.kind, &self.pattern).map_err(|e| {
            ExpectError::invalid_pattern(format!(
                "'{}' is not a valid {}: {e}",
                self.pattern, self.kind
            ))
        })?;

        let mut expectation = Expectation::new(pattern);
        if let Some(ms) = self.timeout_ms {
            expectation = expectation.within(Duration::from_millis(ms));
        }
        if let Some(name) = &self.name {
            expectation = expectation.named(name.clone());
        }
        Ok(expectation)
    }
}

/// A scenario as written in a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Scenario name.
    pub name: String,

    /// Timeout for expectations without their own, in milliseconds.
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,

    /// Expectations in order.
    #[serde(default)]
    pub expect: Vec<ExpectationSpec>,
}

impl ScenarioFile {
    /// Parse a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not a valid scenario.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ExpectError::config(format!("invalid scenario file: {e}")))
    }

    /// Read and parse a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error if it is not a valid scenario.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = ExpectError::with_io_context(
            std::fs::read_to_string(path),
            format!("reading scenario file {}", path.display()),
        )?;
        tracing::debug!(path = %path.display(), "loaded scenario file");
        Self::from_toml_str(&text)
    }

    /// Compile into a [`Scenario`].
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::NoExpectations`] if the file lists none, or
    /// [`ExpectError::InvalidPattern`] naming the first bad entry.
    pub fn into_scenario(self) -> Result<Scenario> {
        let expectations = self
            .expect
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.to_expectation().map_err(|e| match e {
                    ExpectError::InvalidPattern { message } => {
                        ExpectError::invalid_pattern(format!("expect[{index}]: {message}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let scenario = Scenario::new(self.name, expectations)?;
        Ok(match self.default_timeout_ms {
            Some(ms) => scenario.with_default_timeout(Duration::from_millis(ms)),
            None => scenario,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "ir_nec_transceiver"
default_timeout_ms = 20000

[[expect]]
pattern = "IR_main: create RMT RX channel"

[[expect]]
pattern = 'Address=([0-9A-F]{4})'
kind = "regex"
timeout_ms = 5000
name = "decoded frame"

[[expect]]
pattern = "rst:*"
kind = "glob"
"#;

    #[test]
    fn parses_sample() {
        let file = ScenarioFile::from_toml_str(SAMPLE).unwrap();
        assert_eq!(file.name, "ir_nec_transceiver");
        assert_eq!(file.default_timeout_ms, Some(20_000));
        assert_eq!(file.expect.len(), 3);
        assert_eq!(file.expect[0].kind, PatternKind::Literal);
        assert_eq!(file.expect[1].kind, PatternKind::Regex);
        assert_eq!(file.expect[2].kind, PatternKind::Glob);
    }

    #[test]
    fn compiles_into_scenario() {
        let scenario = ScenarioFile::from_toml_str(SAMPLE)
            .unwrap()
            .into_scenario()
            .unwrap();
        assert_eq!(scenario.default_timeout(), Some(Duration::from_secs(20)));
        let second = &scenario.expectations()[1];
        assert_eq!(second.name(), Some("decoded frame"));
        assert_eq!(second.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn bad_regex_names_entry() {
        let text = concat!(
            "name = \"x\"\n",
            "[[expect]]\npattern = \"ok\"\n",
            "[[expect]]\npattern = \"(\"\nkind = \"regex\"\n",
        );
        let err = ScenarioFile::from_toml_str(text)
            .unwrap()
            .into_scenario()
            .unwrap_err();
        assert!(err.to_string().contains("expect[1]"));
    }

    #[test]
    fn empty_scenario_is_rejected() {
        let err = ScenarioFile::from_toml_str("name = \"empty\"\n")
            .unwrap()
            .into_scenario()
            .unwrap_err();
        assert!(matches!(err, ExpectError::NoExpectations));
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let err = ScenarioFile::from_toml_str("name = \"x\"\ntimeout = 3\n").unwrap_err();
        assert!(matches!(err, ExpectError::Config { .. }));
    }

    #[test]
    fn unknown_kind_is_a_config_error() {
        let text = "name = \"x\"\n[[expect]]\npattern = \"a\"\nkind = \"fuzzy\"\n";
        assert!(ScenarioFile::from_toml_str(text).is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let err = ScenarioFile::load("/nonexistent/scenario.toml").unwrap_err();
        assert!(err.to_string().contains("reading scenario file"));
    }
}
