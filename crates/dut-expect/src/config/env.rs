//! Environment-based configuration.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ExpectError, Result};

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "DUT_EXPECT";

/// Variable names understood by dut-expect, without the prefix.
pub mod vars {
    /// Default expectation timeout in seconds (fractions allowed).
    pub const TIMEOUT: &str = "TIMEOUT";
    /// Cap on the diagnostic line buffer.
    pub const MAX_DIAGNOSTIC_LINES: &str = "MAX_DIAGNOSTIC_LINES";
    /// Log filter for the command-line runner.
    pub const LOG: &str = "LOG";
}

/// Environment variable reader.
///
/// Reads the process environment by default. [`EnvConfig::from_vars`]
/// substitutes a fixed set of variables, which keeps tests independent of
/// the real environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
    /// Fixed variables used instead of the process environment.
    overlay: Option<HashMap<String, String>>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a new environment config reader.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            overlay: None,
        }
    }

    /// Create a reader over a fixed set of variables.
    #[must_use]
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            overlay: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Build the full environment variable name.
    #[must_use]
    pub fn var_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Get a string value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let var_name = self.var_name(name);
        match &self.overlay {
            Some(vars) => vars.get(&var_name).cloned(),
            None => std::env::var(&var_name).ok(),
        }
    }

    /// Check if a variable is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a parsed value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the variable if it is set but
    /// does not parse.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.get(name)
            .map(|raw| {
                raw.trim().parse().map_err(|_| {
                    let var = self.var_name(name);
                    ExpectError::config(format!("{var} has invalid value '{raw}'"))
                })
            })
            .transpose()
    }

    /// Get a duration given in seconds, fractions allowed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value is not a non-negative number.
    pub fn duration_secs(&self, name: &str) -> Result<Option<Duration>> {
        let Some(secs) = self.parse::<f64>(name)? else {
            return Ok(None);
        };
        Duration::try_from_secs_f64(secs).map(Some).map_err(|_| {
            ExpectError::config(format!(
                "{} must be a non-negative number of seconds, got {secs}",
                self.var_name(name)
            ))
        })
    }

    /// Get a boolean value.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).map(|v| {
            matches!(
                v.to_lowercase().as_str(),
                "1" | "true" | "yes" | "on" | "enabled"
            )
        })
    }
}
