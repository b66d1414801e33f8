//! Convenient re-exports for common dut-expect usage.
//!
//! ```
//! use dut_expect::prelude::*;
//!
//! let boot = expectations!["IR_main: create RMT RX channel"];
//! assert_eq!(boot.len(), 1);
//! ```

// Macros
pub use crate::{expectations, timeout};

// Matching
pub use crate::expect::{Expectation, Pattern, SequentialMatcher, expect_all};
pub use crate::types::{MatchResult, Verdict};

// Configuration
pub use crate::config::MatcherConfig;

// Error handling
pub use crate::error::{ExpectError, ExpectationTimeout, Result, TimeoutCause};

// Scenarios
pub use crate::scenario::{Scenario, ScenarioReport, ScenarioRunner};

// Line sources
pub use dut_lines::{
    LineReader, LineSource, MonitorConfig, MonitorProcess, ReadOutcome, ReaderConfig,
};
