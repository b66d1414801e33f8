//! Configuration types for dut-expect.
//!
//! [`MatcherConfig`] carries what would otherwise be global test-framework
//! state: the default per-expectation timeout and the size of the
//! diagnostic line buffer. It can be built in code, read from the
//! environment through [`env::EnvConfig`], or come with a scenario file
//! loaded by [`file`].

pub mod env;
pub mod file;

use std::time::Duration;

use crate::error::Result;

pub use env::EnvConfig;
pub use file::{ExpectationSpec, ScenarioFile};

/// Default timeout duration (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the sequential matcher.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dut_expect::MatcherConfig;
///
/// let config = MatcherConfig::builder()
///     .default_timeout(Duration::from_secs(10))
///     .max_diagnostic_lines(200)
///     .build();
///
/// assert_eq!(config.default_timeout, Duration::from_secs(10));
/// assert_eq!(config.max_diagnostic_lines, Some(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Timeout for expectations that do not set their own.
    pub default_timeout: Duration,

    /// Keep at most this many observed lines for diagnostics.
    ///
    /// `None` keeps every line consumed since the previous match.
    pub max_diagnostic_lines: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_diagnostic_lines: None,
        }
    }
}

impl MatcherConfig {
    /// Create a new `MatcherConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for `MatcherConfig`.
    #[must_use]
    pub fn builder() -> MatcherConfigBuilder {
        MatcherConfigBuilder::new()
    }

    /// Default configuration with `DUT_EXPECT_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(&EnvConfig::default())
    }

    /// Apply overrides from an environment reader.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable is set to an unparsable value.
    pub fn with_env(mut self, env: &EnvConfig) -> Result<Self> {
        if let Some(timeout) = env.duration_secs(env::vars::TIMEOUT)? {
            self.default_timeout = timeout;
        }
        if let Some(lines) = env.parse::<usize>(env::vars::MAX_DIAGNOSTIC_LINES)? {
            self.max_diagnostic_lines = Some(lines);
        }
        Ok(self)
    }
}

/// Builder for [`MatcherConfig`].
#[derive(Debug, Clone, Default)]
pub struct MatcherConfigBuilder {
    config: MatcherConfig,
}

impl MatcherConfigBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout.
    #[must_use]
    pub const fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    /// Cap the diagnostic buffer at `lines` entries.
    #[must_use]
    pub const fn max_diagnostic_lines(mut self, lines: usize) -> Self {
        self.config.max_diagnostic_lines = Some(lines);
        self
    }

    /// Keep every observed line for diagnostics.
    #[must_use]
    pub const fn unbounded_diagnostics(mut self) -> Self {
        self.config.max_diagnostic_lines = None;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub const fn build(self) -> MatcherConfig {
        self.config
    }
}
