//! Records and configuration for login attempt tracking.
//!
//! Two records are kept per identity, where an identity is the
//! (email, IP address) pair rather than a user account:
//!
//! - an [`AttemptRecord`] counting failures in the current attempt window,
//!   stored under `login_attempts:<digest>` with a TTL of the attempt window;
//! - a [`LockoutRecord`] holding the lockout expiry, stored under
//!   `login_lockout:<digest>` with a TTL of the lockout duration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{crypto::identity_digest, error::ValidationError};

/// Failures allowed inside one attempt window; the failure that reaches this
/// count triggers the lockout.
pub const MAX_ATTEMPTS: u32 = 5;

/// Seconds an identity stays locked out.
pub const LOCKOUT_DURATION_SECS: i64 = 15 * 60;

/// Seconds during which failures accumulate before the counter resets.
pub const ATTEMPT_WINDOW_SECS: i64 = 15 * 60;

pub const ATTEMPT_KEY_PREFIX: &str = "login_attempts:";
pub const LOCKOUT_KEY_PREFIX: &str = "login_lockout:";

/// Store key for an identity's attempt record.
pub fn attempt_key(email: &str, ip_address: &str) -> String {
    format!("{ATTEMPT_KEY_PREFIX}{}", identity_digest(email, ip_address))
}

/// Store key for an identity's lockout record.
pub fn lockout_key(email: &str, ip_address: &str) -> String {
    format!("{LOCKOUT_KEY_PREFIX}{}", identity_digest(email, ip_address))
}

/// Configuration for login attempt tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttemptConfig {
    /// Failures within the window that lock the identity
    pub max_attempts: u32,
    /// How long a lockout lasts
    pub lockout_duration: Duration,
    /// Length of the window failures are counted in
    pub attempt_window: Duration,
}

impl Default for LoginAttemptConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            lockout_duration: Duration::seconds(LOCKOUT_DURATION_SECS),
            attempt_window: Duration::seconds(ATTEMPT_WINDOW_SECS),
        }
    }
}

impl LoginAttemptConfig {
    /// Reject configurations that would never lock or never expire.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidField(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.lockout_duration <= Duration::zero() {
            return Err(ValidationError::InvalidField(
                "lockout_duration must be positive".to_string(),
            ));
        }
        if self.attempt_window <= Duration::zero() {
            return Err(ValidationError::InvalidField(
                "attempt_window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Failures recorded for an identity since `window_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub count: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub window_start: DateTime<Utc>,
}

impl AttemptRecord {
    /// An empty record whose window opens at `now`.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    /// Whether more than `window` has elapsed since the window opened.
    pub fn window_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.window_start > window
    }
}

/// An active or stale lockout for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub lockout_until: DateTime<Utc>,
}

impl LockoutRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.lockout_until
    }

    /// Whole seconds until the lockout ends, rounded up.
    ///
    /// Any positive remainder, however small, counts as a full second, so an
    /// active lockout never reports 0.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.lockout_until - now;
        if remaining <= Duration::zero() {
            return 0;
        }

        let whole = remaining.num_seconds();
        if remaining > Duration::seconds(whole) {
            whole + 1
        } else {
            whole
        }
    }
}

/// Result of checking whether an identity is locked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockoutStatus {
    pub locked: bool,
    pub remaining_seconds: i64,
}

impl LockoutStatus {
    pub const UNLOCKED: LockoutStatus = LockoutStatus {
        locked: false,
        remaining_seconds: 0,
    };

    pub fn locked_for(remaining_seconds: i64) -> Self {
        Self {
            locked: true,
            remaining_seconds,
        }
    }

    /// Remaining lockout rounded up to whole minutes, for user messages.
    pub fn remaining_minutes(&self) -> i64 {
        (self.remaining_seconds + 59) / 60
    }
}

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptOutcome {
    /// Whether this failure reached the threshold and created a lockout
    pub became_locked: bool,
    /// Length of the lockout just created, 0 when not locked
    pub lockout_seconds: i64,
}

impl AttemptOutcome {
    pub const NOT_LOCKED: AttemptOutcome = AttemptOutcome {
        became_locked: false,
        lockout_seconds: 0,
    };
}
