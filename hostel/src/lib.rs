//! # Hostel
//!
//! Login lockout protection for the hostel management backend. Failed logins
//! are counted per (email, IP address) identity in an expiring key-value
//! store; after too many failures inside the attempt window the identity is
//! locked for a fixed period and further logins are refused without checking
//! credentials.
//!
//! Password hashing and account lookup stay with the application, which plugs
//! them in through a [`CredentialVerifier`].
//!
//! ## Storage Support
//!
//! - In-memory (single process, tests)
//! - SQLite
//!
//! Any other backend can be used by implementing [`TtlStore`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use hostel::{AuthenticatedUser, CredentialVerifier, Error, HostelBuilder};
//!
//! struct Accounts;
//!
//! #[async_trait::async_trait]
//! impl CredentialVerifier for Accounts {
//!     async fn verify(&self, email: &str, password: &str)
//!     -> Result<Option<AuthenticatedUser>, Error> {
//!         Ok((password == "secret").then(|| AuthenticatedUser::new("1", email)))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hostel = HostelBuilder::new()
//!         .with_sqlite("sqlite::memory:")
//!         .await?
//!         .apply_migrations(true)
//!         .build(Accounts)
//!         .await?;
//!
//!     let outcome = hostel.login("student@hostel.edu", "secret", "10.0.0.1").await?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use hostel_core::{LoginAttemptTracker, LoginService};

pub mod builder;

pub use builder::{HostelBuilder, HostelBuilderError, NoStore, WithStore};

/// Re-export core types from hostel_core
///
/// These types are commonly used when working with the Hostel API.
pub use hostel_core::{
    AttemptOutcome, AuthenticatedUser, Clock, CredentialVerifier, Error, LockoutStatus,
    LoginAttemptConfig, LoginOutcome, MemoryTtlStore, SystemClock, TtlStore,
};

#[cfg(feature = "test-util")]
pub use hostel_core::ManualClock;

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding feature is enabled.
#[cfg(feature = "sqlite")]
pub use hostel_storage_sqlite::SqliteTtlStore;

/// The assembled login protection: store, attempt tracker and login flow.
///
/// Construct one with [`HostelBuilder`] or [`Hostel::new`] and share it
/// behind an `Arc` between request handlers.
pub struct Hostel<S: TtlStore, V: CredentialVerifier> {
    store: Arc<S>,
    tracker: Arc<LoginAttemptTracker<S>>,
    login_service: Arc<LoginService<S, V>>,
}

impl<S: TtlStore, V: CredentialVerifier> Hostel<S, V> {
    /// Create a Hostel instance with default thresholds and wall-clock time.
    ///
    /// # Arguments
    ///
    /// * `store` - The TTL store holding attempt and lockout records
    /// * `verifier` - Checks email/password pairs
    pub fn new(store: Arc<S>, verifier: V) -> Self {
        let tracker = Arc::new(LoginAttemptTracker::new(
            store.clone(),
            LoginAttemptConfig::default(),
        ));
        Self::from_parts(store, tracker, Arc::new(verifier))
    }

    pub(crate) fn from_parts(
        store: Arc<S>,
        tracker: Arc<LoginAttemptTracker<S>>,
        verifier: Arc<V>,
    ) -> Self {
        let login_service = Arc::new(LoginService::new(tracker.clone(), verifier));
        Self {
            store,
            tracker,
            login_service,
        }
    }

    /// The login attempt tracker, for callers driving the lockout protocol
    /// themselves.
    pub fn login_attempts(&self) -> &Arc<LoginAttemptTracker<S>> {
        &self.tracker
    }

    /// The login flow service.
    pub fn login_service(&self) -> &Arc<LoginService<S, V>> {
        &self.login_service
    }

    /// Attempt an email/password login from `ip_address`.
    ///
    /// See [`LoginService::login`] for the sequence and error behavior.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<LoginOutcome, Error> {
        self.login_service.login(email, password, ip_address).await
    }

    /// Prepare the store schema.
    pub async fn migrate(&self) -> Result<(), Error> {
        self.store.migrate().await
    }

    /// Health check for the store
    pub async fn health_check(&self) -> Result<(), Error> {
        self.store.health_check().await
    }

    /// Start a background task purging expired store entries.
    ///
    /// # Arguments
    ///
    /// * `shutdown` - A watch receiver that signals when to stop the task
    pub fn start_cleanup_task(
        &self,
        shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        self.tracker.start_cleanup_task(shutdown)
    }
}
