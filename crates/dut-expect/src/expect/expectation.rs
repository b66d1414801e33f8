//! A single ordered expectation.

use std::time::Duration;

use super::pattern::Pattern;
use crate::error::Result;

/// A pattern the DUT output must produce, with an optional timeout.
///
/// Expectations are consumed strictly in list order. One without its own
/// timeout falls back to the matcher's default.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dut_expect::Expectation;
///
/// let boot = Expectation::literal("IR_main: create RMT RX channel")
///     .named("rx channel")
///     .within(Duration::from_secs(5));
///
/// assert_eq!(boot.label(), "rx channel");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pattern: Pattern,
    timeout: Option<Duration>,
    name: Option<String>,
}

impl Expectation {
    /// Create an expectation for the given pattern.
    #[must_use]
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: pattern.into(),
            timeout: None,
            name: None,
        }
    }

    /// Create a literal substring expectation.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(Pattern::literal(text))
    }

    /// Create a regex expectation.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::new(Pattern::regex(pattern)?))
    }

    /// Create a glob expectation.
    ///
    /// # Errors
    ///
    /// Returns an error if the glob is too large to compile.
    pub fn glob(pattern: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Pattern::glob(pattern)?))
    }

    /// Set this expectation's own timeout.
    #[must_use]
    pub const fn within(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Give this expectation a name for logs and reports.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The pattern to look for.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The expectation's own timeout, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The expectation's name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The timeout that applies given the matcher's default.
    #[must_use]
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }

    /// The name if set, otherwise the pattern text.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name().unwrap_or_else(|| self.pattern.as_str())
    }
}

impl From<Pattern> for Expectation {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

impl From<&str> for Expectation {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::PatternKind;

    #[test]
    fn defaults_to_matcher_timeout() {
        let e = Expectation::literal("NEC frame start---");
        assert_eq!(e.timeout(), None);
        assert_eq!(e.effective_timeout(Duration::from_secs(30)), Duration::from_secs(30));
        assert_eq!(e.label(), "NEC frame start---");
    }

    #[test]
    fn own_timeout_wins() {
        let e = Expectation::literal("x").within(Duration::from_millis(500));
        assert_eq!(e.effective_timeout(Duration::from_secs(30)), Duration::from_millis(500));
    }

    #[test]
    fn regex_constructor_validates() {
        assert!(Expectation::regex(r"Command=[0-9A-F]{4}").is_ok());
        assert!(Expectation::regex("(").is_err());
    }

    #[test]
    fn conversions() {
        let e: Expectation = "IR_main".into();
        assert_eq!(e.pattern().kind(), PatternKind::Literal);
        let g = Expectation::from(Pattern::glob("rst:*").unwrap());
        assert_eq!(g.pattern().kind(), PatternKind::Glob);
    }
}
