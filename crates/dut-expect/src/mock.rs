//! Mock DUT support for testing.
//!
//! This module provides a scripted [`LineSource`](dut_lines::LineSource)
//! for testing expectation lists without hardware:
//!
//! - [`MockDut`]: replays an [`EventTimeline`] of lines, delays and closure
//! - [`MockBuilder`]: builds one fluently
//! - [`ir_nec_boot_log`]: a captured-style log of the IR NEC example
//!
//! # Example
//!
//! ```rust
//! use dut_expect::mock::MockBuilder;
//!
//! let dut = MockBuilder::new()
//!     .line("I (312) IR_main: create RMT RX channel")
//!     .delay_ms(50)
//!     .line("NEC frame start---")
//!     .eof()
//!     .build();
//! ```

pub mod builtin;
pub mod dut;
pub mod event;

use std::time::Duration;

pub use builtin::{IR_NEC_MILESTONES, ir_nec_boot_log, nec_symbol_lines};
pub use dut::MockDut;
pub use event::{EventTimeline, MockEvent};

/// A mock replaying the IR NEC boot log.
#[must_use]
pub fn ir_nec_mock() -> MockDut {
    MockDut::from_timeline(ir_nec_boot_log())
}

/// Builder for creating mock DUTs fluently.
#[derive(Debug, Clone, Default)]
pub struct MockBuilder {
    events: Vec<MockEvent>,
}

impl MockBuilder {
    /// Create a new mock builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add one line of output.
    #[must_use]
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.events.push(MockEvent::line(text));
        self
    }

    /// Add several lines of output.
    #[must_use]
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.extend(lines.into_iter().map(MockEvent::line));
        self
    }

    /// Add a delay.
    #[must_use]
    pub fn delay(mut self, duration: Duration) -> Self {
        self.events.push(MockEvent::delay(duration));
        self
    }

    /// Add a delay in milliseconds.
    #[must_use]
    pub fn delay_ms(self, ms: u64) -> Self {
        self.delay(Duration::from_millis(ms))
    }

    /// Close the output.
    #[must_use]
    pub fn eof(mut self) -> Self {
        self.events.push(MockEvent::eof());
        self
    }

    /// Fail the transport with the given message.
    #[must_use]
    pub fn error(mut self, msg: impl Into<String>) -> Self {
        self.events.push(MockEvent::error(msg));
        self
    }

    /// Build the mock DUT.
    #[must_use]
    pub fn build(self) -> MockDut {
        MockDut::from_timeline(EventTimeline::from_events(self.events))
    }
}
