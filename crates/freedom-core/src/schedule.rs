use std::time::{Duration, Instant};

/// Non-blocking refresh timer.
///
/// The app loop asks [`is_due`](Self::is_due) every frame instead of
/// sleeping, so input and rendering never stall between cycles. A manual
/// refresh just makes the next check succeed.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    last_run: Option<Instant>,
    forced: bool,
}

impl RefreshSchedule {
    /// A schedule whose first check is immediately due.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            forced: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if self.forced {
            return true;
        }
        match self.last_run {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        }
    }

    /// Record that a cycle ran at `now`; the next one is due one interval later.
    pub fn mark_ran(&mut self, now: Instant) {
        self.last_run = Some(now);
        self.forced = false;
    }

    /// Make the next check due regardless of the interval.
    pub fn trigger_now(&mut self) {
        self.forced = true;
    }

    /// Change the interval. The next cycle is re-armed from the last run,
    /// so shortening the interval can make a cycle due immediately.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Time left before the next cycle; zero when due.
    pub fn remaining(&self, now: Instant) -> Duration {
        if self.is_due(now) {
            return Duration::ZERO;
        }
        match self.last_run {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}
