//! Email/password login guarded by the login attempt tracker.
//!
//! The service runs the full sequence around a credential check: normalize
//! the email, refuse locked identities before verifying anything, then clear
//! or record attempt state depending on the verdict.

use std::sync::Arc;

use crate::{
    Error,
    auth::{AuthenticatedUser, CredentialVerifier},
    crypto::identity_digest,
    login_attempt::LockoutStatus,
    services::LoginAttemptTracker,
    storage::TtlStore,
    validation::{normalize_email, validate_email, validate_password_present},
};

/// At or below this many remaining attempts, rejections warn about the
/// upcoming lockout.
pub const LOW_ATTEMPTS_WARNING: u32 = 2;

/// What happened to a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; attempt state for the identity was cleared.
    Authenticated(AuthenticatedUser),

    /// The identity was already locked; credentials were not checked.
    LockedOut { retry_after_seconds: i64 },

    /// Credentials rejected and the failure recorded.
    Rejected {
        became_locked: bool,
        remaining_attempts: u32,
        lockout_seconds: i64,
    },
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }

    /// Seconds the client should wait before retrying, if locked.
    pub fn retry_after_seconds(&self) -> Option<i64> {
        match self {
            LoginOutcome::LockedOut {
                retry_after_seconds,
            } => Some(*retry_after_seconds),
            LoginOutcome::Rejected {
                became_locked: true,
                lockout_seconds,
                ..
            } => Some(*lockout_seconds),
            _ => None,
        }
    }

    /// Message shown to the person logging in.
    pub fn message(&self) -> String {
        match self {
            LoginOutcome::Authenticated(_) => "Login successful! Welcome back.".to_string(),
            LoginOutcome::LockedOut {
                retry_after_seconds,
            } => {
                let minutes = LockoutStatus::locked_for(*retry_after_seconds).remaining_minutes();
                format!("Too many failed login attempts. Try again in {minutes} minute(s).")
            }
            LoginOutcome::Rejected {
                became_locked: true,
                ..
            } => "Too many failed attempts. Your account is temporarily locked.".to_string(),
            LoginOutcome::Rejected {
                remaining_attempts,
                ..
            } if *remaining_attempts <= LOW_ATTEMPTS_WARNING => format!(
                "Invalid credentials. {remaining_attempts} attempt(s) remaining before lockout."
            ),
            LoginOutcome::Rejected { .. } => {
                "Invalid email or password. Please try again.".to_string()
            }
        }
    }
}

pub struct LoginService<S: TtlStore, V: CredentialVerifier> {
    tracker: Arc<LoginAttemptTracker<S>>,
    verifier: Arc<V>,
}

impl<S: TtlStore, V: CredentialVerifier> LoginService<S, V> {
    pub fn new(tracker: Arc<LoginAttemptTracker<S>>, verifier: Arc<V>) -> Self {
        Self { tracker, verifier }
    }

    pub fn tracker(&self) -> &Arc<LoginAttemptTracker<S>> {
        &self.tracker
    }

    /// Attempt an email/password login from `ip_address`.
    ///
    /// Malformed input is returned as a validation error without touching
    /// attempt state. Store and verifier failures propagate; a store failure
    /// never lets a login through unchecked.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<LoginOutcome, Error> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password_present(password)?;

        let identity = identity_digest(&email, ip_address);

        let status = self.tracker.is_locked_out(&email, ip_address).await?;
        if status.locked {
            tracing::info!(
                identity = %identity,
                remaining_seconds = status.remaining_seconds,
                "Rejected login for locked identity"
            );
            return Ok(LoginOutcome::LockedOut {
                retry_after_seconds: status.remaining_seconds,
            });
        }

        match self.verifier.verify(&email, password).await? {
            Some(user) => {
                self.tracker.clear_attempts(&email, ip_address).await?;
                tracing::info!(identity = %identity, user_id = %user.id, "Login succeeded");
                Ok(LoginOutcome::Authenticated(user))
            }
            None => {
                let outcome = self.tracker.record_failed_attempt(&email, ip_address).await?;
                let remaining_attempts = if outcome.became_locked {
                    0
                } else {
                    self.tracker
                        .get_remaining_attempts(&email, ip_address)
                        .await?
                };

                tracing::info!(
                    identity = %identity,
                    remaining_attempts,
                    became_locked = outcome.became_locked,
                    "Login rejected"
                );

                Ok(LoginOutcome::Rejected {
                    became_locked: outcome.became_locked,
                    remaining_attempts,
                    lockout_seconds: outcome.lockout_seconds,
                })
            }
        }
    }
}
