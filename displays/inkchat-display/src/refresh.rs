//! Physical refresh rate limiting
//!
//! E-paper panels degrade with frequent refreshes. The limiter only gates
//! the physical refresh; drawing into the frame buffer is never held back.

use embassy_time::{Duration, Instant};

/// Minimum-interval gate for physical panel refreshes
#[derive(Debug, Clone, Copy)]
pub struct RefreshLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshLimiter {
    /// `interval_ms == 0` disables throttling
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms as u64),
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval = Duration::from_millis(u64::from(interval_ms));
    }

    /// Time of the last recorded refresh
    pub fn last_refresh(&self) -> Option<Instant> {
        self.last
    }

    /// Whether a refresh at `now` is permitted
    pub fn allows(&self, now: Instant) -> bool {
        if self.interval.as_ticks() == 0 {
            return true;
        }
        match self.last {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        }
    }

    /// Note that a refresh happened at `now`
    pub fn record(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_refresh_allowed() {
        let limiter = RefreshLimiter::new(500);
        assert!(limiter.allows(Instant::from_millis(0)));
    }

    #[test]
    fn test_interval_enforced() {
        let mut limiter = RefreshLimiter::new(500);
        limiter.record(Instant::from_millis(1_000));

        assert!(!limiter.allows(Instant::from_millis(1_200)));
        assert!(!limiter.allows(Instant::from_millis(1_499)));
        assert!(limiter.allows(Instant::from_millis(1_500)));
        // Clock behind the last refresh
        assert!(!limiter.allows(Instant::from_millis(900)));
    }

    #[test]
    fn test_zero_interval_disables() {
        let mut limiter = RefreshLimiter::new(500);
        limiter.record(Instant::from_millis(1_000));
        limiter.set_interval_ms(0);
        assert!(limiter.allows(Instant::from_millis(1_000)));
    }
}
