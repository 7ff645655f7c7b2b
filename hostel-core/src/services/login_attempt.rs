//! Login attempt tracking and lockout for the login endpoint.
//!
//! Failures are counted per identity, the (email, IP address) pair, so a
//! correct login from another address or a different email from the same
//! address is tracked independently.
//!
//! # Protocol
//!
//! The login handler drives the tracker in a fixed order:
//!
//! 1. [`LoginAttemptTracker::is_locked_out`] before verifying credentials;
//!    a locked identity is rejected without verification.
//! 2. [`LoginAttemptTracker::record_failed_attempt`] after a failed
//!    verification, optionally followed by
//!    [`LoginAttemptTracker::get_remaining_attempts`] for the user message.
//! 3. [`LoginAttemptTracker::clear_attempts`] after a successful verification.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hostel_core::{LoginAttemptConfig, MemoryTtlStore, services::LoginAttemptTracker};
//!
//! let tracker = LoginAttemptTracker::new(
//!     Arc::new(MemoryTtlStore::new()),
//!     LoginAttemptConfig::default(),
//! );
//!
//! let status = tracker.is_locked_out("student@hostel.edu", "10.0.0.1").await?;
//! if status.locked {
//!     // Reject with a retry hint of status.remaining_seconds
//! }
//! ```

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    clock::{Clock, SystemClock},
    crypto::identity_digest,
    error::StorageError,
    login_attempt::{
        AttemptOutcome, AttemptRecord, LockoutRecord, LockoutStatus, LoginAttemptConfig,
        attempt_key, lockout_key,
    },
    storage::TtlStore,
};

/// Interval between purges of expired store entries.
const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Service tracking failed logins and lockouts per (email, IP) identity.
///
/// # Thread Safety
///
/// The tracker holds no state of its own beyond configuration, so it can be
/// shared across tasks and run on any number of instances that reach the
/// same store.
pub struct LoginAttemptTracker<S: TtlStore> {
    store: Arc<S>,
    config: LoginAttemptConfig,
    clock: Arc<dyn Clock>,
}

impl<S: TtlStore> LoginAttemptTracker<S> {
    /// Create a tracker reading wall-clock time.
    ///
    /// # Arguments
    ///
    /// * `store` - The shared TTL store holding attempt and lockout records
    /// * `config` - Thresholds and durations
    pub fn new(store: Arc<S>, config: LoginAttemptConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a tracker with an explicit time source.
    pub fn with_clock(store: Arc<S>, config: LoginAttemptConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LoginAttemptConfig {
        &self.config
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Check whether an identity is locked out.
    ///
    /// A lockout whose expiry has passed is deleted and reported as unlocked,
    /// regardless of whether the store has evicted it yet.
    ///
    /// # Returns
    ///
    /// `locked = true` with the remaining seconds rounded up, or
    /// [`LockoutStatus::UNLOCKED`].
    pub async fn is_locked_out(&self, email: &str, ip_address: &str) -> Result<LockoutStatus, Error> {
        let key = lockout_key(email, ip_address);
        let Some(lockout) = self.load::<LockoutRecord>(&key).await? else {
            return Ok(LockoutStatus::UNLOCKED);
        };

        let now = self.clock.now();
        if lockout.is_expired(now) {
            tracing::debug!(
                identity = %identity_digest(email, ip_address),
                "Lockout expired, removing record"
            );
            self.store.delete(&key).await?;
            return Ok(LockoutStatus::UNLOCKED);
        }

        Ok(LockoutStatus::locked_for(lockout.remaining_seconds(now)))
    }

    /// Record a failed login attempt.
    ///
    /// Failures older than the attempt window are discarded all at once: the
    /// first failure after the window lapses starts a new window with a count
    /// of one. The failure that brings the count to `max_attempts` replaces
    /// the attempt record with a lockout.
    ///
    /// This does not check for an existing lockout; callers check
    /// [`Self::is_locked_out`] first.
    ///
    /// # Concurrency
    ///
    /// The read-modify-write of the attempt record is not atomic. Two
    /// concurrent failures for the same identity can read the same count and
    /// both write `count + 1`, losing one failure. A sustained attacker still
    /// crosses the threshold within a few extra requests.
    pub async fn record_failed_attempt(
        &self,
        email: &str,
        ip_address: &str,
    ) -> Result<AttemptOutcome, Error> {
        let key = attempt_key(email, ip_address);
        let now = self.clock.now();

        let mut record = self
            .load::<AttemptRecord>(&key)
            .await?
            .unwrap_or_else(|| AttemptRecord::fresh(now));

        if record.window_expired(now, self.config.attempt_window) {
            record = AttemptRecord::fresh(now);
        }

        record.count = record.count.saturating_add(1);
        self.save(&key, &record, self.config.attempt_window).await?;

        let identity = identity_digest(email, ip_address);
        tracing::debug!(
            identity = %identity,
            count = record.count,
            "Recorded failed login attempt"
        );

        if record.count < self.config.max_attempts {
            return Ok(AttemptOutcome::NOT_LOCKED);
        }

        let lockout = LockoutRecord {
            lockout_until: now + self.config.lockout_duration,
        };
        self.save(
            &lockout_key(email, ip_address),
            &lockout,
            self.config.lockout_duration,
        )
        .await?;
        self.store.delete(&key).await?;

        tracing::warn!(
            identity = %identity,
            attempts = record.count,
            lockout_seconds = self.config.lockout_duration.num_seconds(),
            "Login identity locked out after repeated failures"
        );

        Ok(AttemptOutcome {
            became_locked: true,
            lockout_seconds: self.config.lockout_duration.num_seconds(),
        })
    }

    /// Clear all attempt and lockout state for an identity.
    ///
    /// Called after a successful login. Succeeds when nothing is stored.
    pub async fn clear_attempts(&self, email: &str, ip_address: &str) -> Result<(), Error> {
        self.store.delete(&attempt_key(email, ip_address)).await?;
        self.store.delete(&lockout_key(email, ip_address)).await?;
        Ok(())
    }

    /// Failures left before lockout, for user messaging.
    ///
    /// Reads the attempt record as stored: lockout state is not consulted and
    /// a lapsed window is not reset here, so the value can be pessimistic
    /// until the next failure resets the window.
    pub async fn get_remaining_attempts(&self, email: &str, ip_address: &str) -> Result<u32, Error> {
        let count = self
            .load::<AttemptRecord>(&attempt_key(email, ip_address))
            .await?
            .map_or(0, |record| record.count);

        Ok(self.config.max_attempts.saturating_sub(count))
    }

    /// Start the background cleanup task.
    ///
    /// Periodically asks the store to drop expired entries. Stores that evict
    /// on their own treat this as a no-op.
    ///
    /// # Arguments
    ///
    /// * `shutdown` - A watch receiver that signals when to stop the task
    pub fn start_cleanup_task(
        &self,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(CLEANUP_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        match store.purge_expired().await {
                            Ok(count) if count > 0 => {
                                tracing::info!(
                                    count = count,
                                    "Purged expired login attempt entries"
                                );
                            }
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    "Failed to purge expired login attempt entries"
                                );
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!("Shutting down login attempt cleanup task");
                        break;
                    }
                }
            }
        })
    }

    /// Load and decode a record, treating undecodable values as absent.
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed login attempt record");
                Ok(None)
            }
        }
    }

    async fn save<T: Serialize>(
        &self,
        key: &str,
        record: &T,
        ttl: chrono::Duration,
    ) -> Result<(), Error> {
        let value = serde_json::to_string(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &value, ttl).await
    }
}
