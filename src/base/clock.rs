//! Time sources.
//!
//! The cookie store never calls `OffsetDateTime::now_utc()` directly; it asks
//! a [`Clock`], so tests can move time forward deterministically.

use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The platform wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(datetime!(2009-08-11 12:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2009-08-11 12:00:00 UTC));

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), datetime!(2009-08-11 12:01:30 UTC));

        clock.set(datetime!(2010-01-01 00:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2010-01-01 00:00:00 UTC));
    }

    #[test]
    fn test_system_clock_is_utc() {
        let now = SystemClock.now();
        assert!(now.offset().is_utc());
    }
}
