//! Builder pattern for constructing Hostel instances
//!
//! This module provides a type-safe builder for creating [`Hostel`] instances
//! with compile-time validation of store configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use hostel::{HostelBuilder, LoginAttemptConfig};
//! # use hostel::{AuthenticatedUser, CredentialVerifier, Error};
//! # struct Accounts;
//! # #[async_trait::async_trait]
//! # impl CredentialVerifier for Accounts {
//! #     async fn verify(&self, _: &str, _: &str) -> Result<Option<AuthenticatedUser>, Error> {
//! #         Ok(None)
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build with SQLite and auto-migration
//!     let hostel = HostelBuilder::new()
//!         .with_sqlite("sqlite://hostel.db?mode=rwc")
//!         .await?
//!         .apply_migrations(true)
//!         .build(Accounts)
//!         .await?;
//!
//!     // Or keep everything in memory
//!     let hostel = HostelBuilder::new()
//!         .with_memory_store()
//!         .with_login_attempt_config(LoginAttemptConfig::default())
//!         .build(Accounts)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use hostel_core::{
    Clock, CredentialVerifier, LoginAttemptConfig, LoginAttemptTracker, MemoryTtlStore,
    SystemClock, TtlStore,
};

use crate::Hostel;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when building a Hostel instance.
#[derive(Debug, thiserror::Error)]
pub enum HostelBuilderError {
    /// Failed to connect to the store backend
    #[error("Storage connection failed: {0}")]
    StorageConnection(String),

    /// Failed to run database migrations
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// ============================================================================
// Type-State Markers
// ============================================================================

/// Marker type indicating no store has been configured yet.
///
/// This is the initial state of [`HostelBuilder`].
pub struct NoStore;

/// Marker type indicating a store has been configured.
pub struct WithStore<S: TtlStore> {
    store: Arc<S>,
}

// ============================================================================
// Builder Implementation
// ============================================================================

/// A type-safe builder for constructing [`Hostel`] instances.
///
/// # Type States
///
/// - [`NoStore`]: Initial state, a store must be configured
/// - [`WithStore<S>`]: Store configured, ready to build or add more configuration
///
/// The clock can only be set before a store is chosen, so the built-in stores
/// and the tracker always agree on the current time.
pub struct HostelBuilder<Store> {
    store: Store,
    clock: Arc<dyn Clock>,
    login_attempt_config: LoginAttemptConfig,
    apply_migrations: bool,
}

impl Default for HostelBuilder<NoStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl HostelBuilder<NoStore> {
    /// Create a new builder with default configuration.
    ///
    /// # Defaults
    ///
    /// - Login attempts: 5 failures within 15 minutes lock for 15 minutes
    /// - Clock: wall-clock time
    /// - Apply migrations: false
    pub fn new() -> Self {
        Self {
            store: NoStore,
            clock: Arc::new(SystemClock),
            login_attempt_config: LoginAttemptConfig::default(),
            apply_migrations: false,
        }
    }

    /// Use `clock` as the time source for the store and the tracker.
    ///
    /// Mostly useful in tests, together with the `ManualClock` from the `test-util`
    /// feature.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Keep attempt and lockout records in process memory.
    ///
    /// State is lost on restart and not shared between processes.
    pub fn with_memory_store(self) -> HostelBuilder<WithStore<MemoryTtlStore>> {
        let store = Arc::new(MemoryTtlStore::with_clock(self.clock.clone()));
        self.with_store(store)
    }

    /// Use an existing store implementation.
    ///
    /// The store is expected to keep its own notion of time; the builder's
    /// clock only drives the tracker.
    pub fn with_store<S: TtlStore>(self, store: Arc<S>) -> HostelBuilder<WithStore<S>> {
        HostelBuilder {
            store: WithStore { store },
            clock: self.clock,
            login_attempt_config: self.login_attempt_config,
            apply_migrations: self.apply_migrations,
        }
    }
}

// ============================================================================
// Storage Configuration Methods (NoStore -> WithStore)
// ============================================================================

#[cfg(feature = "sqlite")]
impl HostelBuilder<NoStore> {
    /// Configure SQLite storage by connecting to the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - SQLite connection URL (e.g., "sqlite::memory:" or "sqlite://path/to/db.sqlite?mode=rwc")
    pub async fn with_sqlite(
        self,
        url: &str,
    ) -> Result<HostelBuilder<WithStore<crate::SqliteTtlStore>>, HostelBuilderError> {
        let store = crate::SqliteTtlStore::connect(url)
            .await
            .map_err(|e| HostelBuilderError::StorageConnection(e.to_string()))?
            .with_clock(self.clock.clone());

        Ok(self.with_store(Arc::new(store)))
    }

    /// Configure SQLite storage using an existing connection pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - An existing SQLite connection pool
    pub fn with_sqlite_pool(
        self,
        pool: sqlx::SqlitePool,
    ) -> HostelBuilder<WithStore<crate::SqliteTtlStore>> {
        let store = crate::SqliteTtlStore::new(pool).with_clock(self.clock.clone());
        self.with_store(Arc::new(store))
    }
}

// ============================================================================
// Configuration Methods (available after a store is configured)
// ============================================================================

impl<S: TtlStore> HostelBuilder<WithStore<S>> {
    /// Configure login attempt thresholds and durations.
    ///
    /// The configuration is checked in [`HostelBuilder::build`].
    pub fn with_login_attempt_config(mut self, config: LoginAttemptConfig) -> Self {
        self.login_attempt_config = config;
        self
    }

    /// Whether to run store migrations during [`HostelBuilder::build`].
    ///
    /// Default: false
    pub fn apply_migrations(mut self, apply: bool) -> Self {
        self.apply_migrations = apply;
        self
    }

    /// Build the Hostel instance.
    ///
    /// # Arguments
    ///
    /// * `verifier` - Checks email/password pairs for the login flow
    ///
    /// # Errors
    ///
    /// Returns an error if the login attempt configuration is invalid or if
    /// migrations were requested and fail.
    pub async fn build<V: CredentialVerifier>(
        self,
        verifier: V,
    ) -> Result<Hostel<S, V>, HostelBuilderError> {
        self.login_attempt_config
            .validate()
            .map_err(|e| HostelBuilderError::InvalidConfiguration(e.to_string()))?;

        if self.apply_migrations {
            self.store
                .store
                .migrate()
                .await
                .map_err(|e| HostelBuilderError::Migration(e.to_string()))?;
        }

        let tracker = Arc::new(LoginAttemptTracker::with_clock(
            self.store.store.clone(),
            self.login_attempt_config,
            self.clock,
        ));

        tracing::debug!(
            max_attempts = tracker.config().max_attempts,
            "Built login attempt tracker"
        );

        Ok(Hostel::from_parts(
            self.store.store,
            tracker,
            Arc::new(verifier),
        ))
    }
}
