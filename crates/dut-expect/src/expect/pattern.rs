//! Pattern types for expectations.
//!
//! A pattern is tested against one complete DUT line at a time. Literal
//! patterns match by substring containment, regex patterns by search (not
//! anchored unless the expression says so), and glob patterns by an
//! unanchored search where `*` spans any run of characters and `?` exactly
//! one.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a pattern's text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Substring containment.
    #[default]
    Literal,
    /// Regular expression search.
    Regex,
    /// Glob search with `*` and `?`.
    Glob,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::Regex => f.write_str("regex"),
            Self::Glob => f.write_str("glob"),
        }
    }
}

/// A pattern that can be matched against a DUT log line.
#[derive(Clone)]
pub enum Pattern {
    /// Match a substring.
    Literal(String),

    /// Match a regular expression.
    Regex(CompiledRegex),

    /// Match a glob pattern, compiled to an equivalent regex.
    Glob(CompiledRegex),
}

impl Pattern {
    /// Create a literal pattern.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    /// Create a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self::Regex(CompiledRegex::new(pattern.to_string(), regex)))
    }

    /// Create a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the translated expression exceeds the regex
    /// engine's size limit.
    pub fn glob(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&glob_to_regex(&pattern))?;
        Ok(Self::Glob(CompiledRegex::new(pattern, regex)))
    }

    /// Create a pattern of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if `kind` is [`PatternKind::Regex`] and `text` is not
    /// a valid regular expression, or if a glob is too large to compile.
    pub fn from_kind(kind: PatternKind, text: &str) -> Result<Self, regex::Error> {
        match kind {
            PatternKind::Literal => Ok(Self::literal(text)),
            PatternKind::Regex => Self::regex(text),
            PatternKind::Glob => Self::glob(text),
        }
    }

    /// The kind of this pattern.
    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        match self {
            Self::Literal(_) => PatternKind::Literal,
            Self::Regex(_) => PatternKind::Regex,
            Self::Glob(_) => PatternKind::Glob,
        }
    }

    /// Get the pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Regex(r) | Self::Glob(r) => r.pattern(),
        }
    }

    /// Check if this pattern matches the given line.
    ///
    /// Returns the match position and captures if successful.
    #[must_use]
    pub fn matches(&self, line: &str) -> Option<PatternMatch> {
        match self {
            Self::Literal(s) => line.find(s.as_str()).map(|pos| PatternMatch {
                start: pos,
                end: pos + s.len(),
                captures: Vec::new(),
            }),
            Self::Regex(r) => r.captures_at(line),
            Self::Glob(r) => r.find(line).map(|m| PatternMatch {
                start: m.start(),
                end: m.end(),
                captures: Vec::new(),
            }),
        }
    }

    /// Check whether the line matches, without collecting positions.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(s) => line.contains(s.as_str()),
            Self::Regex(r) | Self::Glob(r) => r.is_match(line),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "Literal({s:?})"),
            Self::Regex(r) => write!(f, "Regex({:?})", r.pattern()),
            Self::Glob(r) => write!(f, "Glob({:?})", r.pattern()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

/// A compiled regular expression with its source pattern.
#[derive(Clone)]
pub struct CompiledRegex {
    pattern: String,
    regex: Regex,
}

impl CompiledRegex {
    /// Create a new compiled regex.
    #[must_use]
    pub const fn new(pattern: String, regex: Regex) -> Self {
        Self { pattern, regex }
    }

    /// Get the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Find the first match in the text.
    #[must_use]
    pub fn find<'a>(&self, text: &'a str) -> Option<regex::Match<'a>> {
        self.regex.find(text)
    }

    /// Check whether the text contains a match.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Find the first match and collect its capture groups in one pass.
    fn captures_at(&self, text: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(text)?;
        let whole = caps.get(0)?;
        Some(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            captures: caps
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        })
    }
}

/// Result of a successful pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Start position of the match in the line.
    pub start: usize,
    /// End position of the match in the line.
    pub end: usize,
    /// Capture groups (for regex patterns) in order; entry 0 is group 1.
    ///
    /// A group that did not take part in the match is `None`, so positions
    /// never shift.
    pub captures: Vec<Option<String>>,
}

impl PatternMatch {
    /// Get the matched text from the original line.
    #[must_use]
    pub fn as_str<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    /// Text of capture group `index` (0 is the first group), if it matched.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index)?.as_deref()
    }
}

/// Translate a glob into an unanchored regex expression.
///
/// Every character other than `*` and `?` is escaped.
fn glob_to_regex(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() * 2);
    let mut literal = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            _ => expr.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }
    expr
}
