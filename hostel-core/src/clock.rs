//! Time source used by the tracker and the stores.
//!
//! Everything that compares timestamps reads the current time through a
//! [`Clock`] so that window and lockout expiry can be exercised with simulated
//! time. Production code uses [`SystemClock`]; the simulated `ManualClock`
//! is only compiled for tests or with the `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
use std::sync::RwLock;

#[cfg(any(test, feature = "test-util"))]
use chrono::Duration;
use chrono::{DateTime, Utc};

/// A source of the current UTC wall-clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// All instances sharing a store must agree on time, so tests hand the same
/// `Arc<ManualClock>` to the store and to the tracker.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(901));
        assert_eq!(clock.now(), start + Duration::seconds(901));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_is_close_to_now() {
        let delta = Utc::now() - SystemClock.now();
        assert!(delta.num_seconds().abs() < 5);
    }
}
