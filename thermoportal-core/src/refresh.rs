//! Refresh-interval gating
//!
//! Each periodic job (clock sync, weather fetch) owns a [`RefreshTimer`].
//! A timer that has never been marked is due immediately. After that it is
//! due once strictly more than its interval has passed since the last mark.
//! Callers mark only after the job succeeded, so failures retry on the next
//! loop iteration.

/// Timer tracking when a periodic job last succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshTimer {
    /// Minimum time between refreshes (ms)
    interval_ms: u64,
    /// Monotonic timestamp of the last successful refresh (ms)
    last_ms: Option<u64>,
}

impl RefreshTimer {
    /// Create a timer that is due immediately
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Check whether the job should run at `now_ms`
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_ms {
            None => true,
            // A clock that went backwards is treated as not yet due
            Some(last) => now_ms
                .checked_sub(last)
                .is_some_and(|elapsed| elapsed > self.interval_ms),
        }
    }

    /// Record a successful refresh at `now_ms`
    pub fn mark(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    /// Timestamp of the last successful refresh
    pub fn last_refresh(&self) -> Option<u64> {
        self.last_ms
    }
}
