//! Core functionality for the hostel management backend
//!
//! This crate contains the login attempt tracker that guards the login
//! endpoint, the expiring key-value store it keeps its state in, and the
//! login flow built on top of it.
//!
//! See [`services::LoginAttemptTracker`] for the lockout state machine,
//! [`storage::TtlStore`] for the storage contract, and
//! [`services::LoginService`] for the login sequence.
//!
//! Storage backends other than the in-memory [`MemoryTtlStore`] live in their
//! own crates and implement [`TtlStore`].
pub mod auth;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod login_attempt;
pub mod services;
pub mod storage;
pub mod validation;

pub use auth::{AuthenticatedUser, CredentialVerifier};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use error::Error;
pub use login_attempt::{AttemptOutcome, LockoutStatus, LoginAttemptConfig};
pub use services::{LoginAttemptTracker, LoginOutcome, LoginService};
pub use storage::{MemoryTtlStore, TtlStore};
