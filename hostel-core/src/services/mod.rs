//! Service layer for business logic
//!
//! This module contains the login attempt tracker and the login flow that
//! drives it.

pub mod login;
pub mod login_attempt;

pub use login::{LOW_ATTEMPTS_WARNING, LoginOutcome, LoginService};
pub use login_attempt::LoginAttemptTracker;
