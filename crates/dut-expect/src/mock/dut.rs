//! Scripted DUT line source.

use std::io;
use std::time::Duration;

use dut_lines::{LineError, LineSource, ReadOutcome};
use tokio::time::Instant;

use super::event::{EventTimeline, MockEvent};

/// Stand-in for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A [`LineSource`] that replays an [`EventTimeline`].
///
/// Delays are served against each read's timeout: a delay longer than the
/// time left yields `TimedOut` and the rest of the delay carries over to the
/// next read. Once the timeline is exhausted without an `Eof` event, the
/// mock behaves like a powered but silent device and every read times out.
#[derive(Debug, Clone)]
pub struct MockDut {
    timeline: EventTimeline,
    pending_delay: Option<Duration>,
    closed: bool,
    lines_delivered: usize,
}

impl MockDut {
    /// Create a mock from a timeline.
    #[must_use]
    pub const fn from_timeline(timeline: EventTimeline) -> Self {
        Self {
            timeline,
            pending_delay: None,
            closed: false,
            lines_delivered: 0,
        }
    }

    /// Create a mock that emits `lines` and then closes.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines
            .into_iter()
            .map(MockEvent::line)
            .chain(std::iter::once(MockEvent::Eof))
            .collect::<EventTimeline>()
            .into()
    }

    /// Number of lines handed out so far.
    #[must_use]
    pub const fn lines_delivered(&self) -> usize {
        self.lines_delivered
    }

    /// Rewind to the start of the timeline.
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.pending_delay = None;
        self.closed = false;
        self.lines_delivered = 0;
    }

    async fn next(&mut self, timeout: Duration) -> dut_lines::Result<ReadOutcome> {
        if self.closed {
            return Ok(ReadOutcome::EndOfStream);
        }

        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
        loop {
            if let Some(delay) = self.pending_delay.take() {
                let left = deadline.saturating_duration_since(Instant::now());
                if delay > left {
                    tokio::time::sleep(left).await;
                    self.pending_delay = Some(delay - left);
                    return Ok(ReadOutcome::TimedOut);
                }
                tokio::time::sleep(delay).await;
            }

            match self.timeline.next_event().cloned() {
                Some(MockEvent::Line(line)) => {
                    self.lines_delivered += 1;
                    return Ok(ReadOutcome::Line(line));
                }
                Some(MockEvent::Delay(delay)) => self.pending_delay = Some(delay),
                Some(MockEvent::Eof) => {
                    self.closed = true;
                    return Ok(ReadOutcome::EndOfStream);
                }
                Some(MockEvent::Error(msg)) => {
                    self.closed = true;
                    return Err(LineError::Io(io::Error::other(msg)));
                }
                None => {
                    tokio::time::sleep_until(deadline).await;
                    return Ok(ReadOutcome::TimedOut);
                }
            }
        }
    }
}

impl From<EventTimeline> for MockDut {
    fn from(timeline: EventTimeline) -> Self {
        Self::from_timeline(timeline)
    }
}

impl LineSource for MockDut {
    async fn read_line(&mut self, timeout: Duration) -> dut_lines::Result<ReadOutcome> {
        self.next(timeout).await
    }

    fn is_alive(&self) -> bool {
        !self.closed
    }
}
