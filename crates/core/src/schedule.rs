/// Fixed-period refresh timer.
///
/// The core owns no event loop. The runner asks for `deadline()`, sleeps
/// its loop until then, and calls `mark_ran` after each `refresh_all`.
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Instant,
}

impl RefreshSchedule {
    /// First tick is one interval after `now`
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Restart the period from `now`. Manual refreshes call this too.
    pub fn mark_ran(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}
