//! dut-expect: Ordered log expectations for hardware-in-the-loop tests
//!
//! This crate checks that a device under test (DUT) prints an ordered list
//! of expected lines, each within its own timeout. Lines are consumed from
//! a live [`LineSource`](dut_lines::LineSource) as they arrive; lines that
//! do not match the current expectation are skipped and never revisited.
//!
//! # Features
//!
//! - **Sequential matching** with per-expectation deadlines
//! - **Literal, regex and glob patterns**
//! - **Diagnostics** listing every line seen since the last match
//! - **Scenarios** from code, TOML files or the [`expectations!`] macro
//! - **Mock DUT** for testing without hardware
//! - **Command-line runner** (feature: `cli`)
//!
//! # Example
//!
//! ```
//! use dut_expect::prelude::*;
//! use dut_expect::mock::ir_nec_mock;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> dut_expect::Result<()> {
//! let expected = expectations![
//!     "IR_main: create RMT RX channel",
//!     "IR_main: enable RMT TX and RX channels",
//!     frame: "NEC frame start---" within 5 s,
//! ];
//!
//! let results = expect_all(&mut ir_nec_mock(), &expected).await?;
//! assert_eq!(results.len(), 3);
//! # Ok(())
//! # }
//! ```

// Lets the macros' `::dut_expect::` paths resolve inside this crate.
extern crate self as dut_expect;

// Re-export macros
pub use dut_expect_macros::{expectations, timeout};

pub mod config;
pub mod error;
pub mod expect;
pub mod mock;
pub mod prelude;
pub mod scenario;
pub mod sync;
pub mod types;
pub mod util;

pub use config::{EnvConfig, MatcherConfig, MatcherConfigBuilder, ScenarioFile};
pub use error::{ExpectError, ExpectationTimeout, Result, TimeoutCause};
pub use expect::{
    CompiledRegex, Expectation, MatchState, Pattern, PatternKind, PatternMatch, SequentialMatcher,
    expect_all,
};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner};
pub use sync::{SyncMatcher, block_on};
pub use types::{MatchResult, Verdict};
pub use util::Deadline;

// Line capture
pub use dut_lines;
pub use dut_lines::{
    LineReader, LineSource, MonitorConfig, MonitorProcess, ReadOutcome, ReaderConfig,
};
