//! Rest countdown between sets.

use std::time::Duration;

/// Countdown driven by explicit elapsed durations
///
/// The timer never reads the clock itself; callers feed it the time that
/// passed, which keeps sessions deterministic under test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestTimer {
    total: Duration,
    remaining: Duration,
}

impl RestTimer {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    /// Advance the countdown, returning the time left (saturates at zero)
    pub fn tick(&mut self, elapsed: Duration) -> Duration {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Share of the rest still to go, 1.0 at start and 0.0 when done
    pub fn fraction_remaining(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        self.remaining.as_secs_f64() / self.total.as_secs_f64()
    }
}
