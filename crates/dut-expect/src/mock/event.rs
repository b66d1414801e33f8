//! Scripted events for a mock DUT.

use std::time::Duration;

/// One step of a mock DUT's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// A complete line of output.
    Line(String),
    /// Silence for the given duration before the next event.
    Delay(Duration),
    /// The output closes.
    Eof,
    /// The transport fails with the given message; the output closes.
    Error(String),
}

impl MockEvent {
    /// Create a line event.
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    /// Create a delay event.
    #[must_use]
    pub const fn delay(duration: Duration) -> Self {
        Self::Delay(duration)
    }

    /// Create a delay event from milliseconds.
    #[must_use]
    pub const fn delay_ms(ms: u64) -> Self {
        Self::Delay(Duration::from_millis(ms))
    }

    /// Create an EOF event.
    #[must_use]
    pub const fn eof() -> Self {
        Self::Eof
    }

    /// Create an error event.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Check if this is a line event.
    #[must_use]
    pub const fn is_line(&self) -> bool {
        matches!(self, Self::Line(_))
    }
}

/// An ordered list of events with a replay cursor.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    events: Vec<MockEvent>,
    position: usize,
}

impl EventTimeline {
    /// Create a new empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from a list of events.
    #[must_use]
    pub const fn from_events(events: Vec<MockEvent>) -> Self {
        Self { events, position: 0 }
    }

    /// Add an event to the timeline.
    pub fn push(&mut self, event: MockEvent) {
        self.events.push(event);
    }

    /// Take the next event.
    pub fn next_event(&mut self) -> Option<&MockEvent> {
        let event = self.events.get(self.position)?;
        self.position += 1;
        Some(event)
    }

    /// Rewind to the first event.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Number of events not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.position)
    }

    /// All events, replayed or not.
    #[must_use]
    pub fn events(&self) -> &[MockEvent] {
        &self.events
    }
}

impl FromIterator<MockEvent> for EventTimeline {
    fn from_iter<I: IntoIterator<Item = MockEvent>>(iter: I) -> Self {
        Self::from_events(iter.into_iter().collect())
    }
}
