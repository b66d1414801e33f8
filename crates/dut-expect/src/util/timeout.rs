//! Deadline tracking for a single expectation.
//!
//! Uses `tokio::time::Instant` so that tests running on a paused clock see
//! deadlines expire without real waiting.

use std::time::Duration;

use tokio::time::Instant;

/// A deadline started at a known instant.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    deadline: Instant,
}

impl Deadline {
    /// Create a new deadline from now.
    #[must_use]
    pub fn from_now(duration: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: started.checked_add(duration).unwrap_or_else(far_future),
        }
    }

    /// Check if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Get the remaining time until the deadline.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Time since the deadline was started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The total duration this deadline was created with.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.deadline.saturating_duration_since(self.started)
    }
}

/// Roughly thirty years ahead, for timeouts too large to add to `now`.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}
