use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A user whose credentials were accepted by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Checks an email/password pair against the account store.
///
/// Password hashing and account lookup live outside this crate. The verifier
/// reports a plain accept or reject; reasons for rejection (unknown email,
/// wrong password, inactive account) are deliberately not distinguished so
/// that the login response cannot be used to enumerate accounts.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Verify credentials for an already normalized email.
    ///
    /// # Returns
    ///
    /// `Ok(Some(user))` when accepted, `Ok(None)` when rejected, `Err` when
    /// the verifier itself could not run.
    async fn verify(&self, email: &str, password: &str)
    -> Result<Option<AuthenticatedUser>, Error>;
}

#[async_trait]
impl<T: CredentialVerifier + ?Sized> CredentialVerifier for Arc<T> {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>, Error> {
        (**self).verify(email, password).await
    }
}
