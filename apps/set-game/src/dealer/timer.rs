use std::time::Duration;

use tokio::time::Instant;

/// The dealer's round countdown.
///
/// Time is passed in explicitly so callers read the clock once per step.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    timeout: Duration,
    warning: Duration,
    deadline: Instant,
}

impl RoundTimer {
    pub fn starting_at(now: Instant, timeout: Duration, warning: Duration) -> Self {
        Self {
            timeout,
            warning,
            deadline: now + timeout,
        }
    }

    /// Restart the full countdown from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.deadline = now + self.timeout;
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    pub fn is_warning(&self, now: Instant) -> bool {
        self.remaining(now) <= self.warning
    }

    /// When the countdown next needs attention: one `tick` ahead (or
    /// `warning_tick` inside the warning window), never past the deadline
    /// and never past the start of the warning window.
    pub fn next_wake(&self, now: Instant, tick: Duration, warning_tick: Duration) -> Instant {
        let remaining = self.remaining(now);
        let step = if self.is_warning(now) {
            warning_tick
        } else {
            tick.min(remaining.saturating_sub(self.warning))
        };
        now + step.min(remaining)
    }
}
