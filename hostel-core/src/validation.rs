//! Input normalization and validation for the login flow
//!
//! The login attempt tracker keys its state on the exact email string it is
//! given, so every caller must normalize emails the same way before tracking.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Lazy-loaded email shape regex
///
/// Only the `local@domain.tld` shape is checked: no whitespace, exactly one
/// `@`, and a dot in the domain. Anything the account store could hold
/// (apostrophes, unicode local parts) must reach the credential verifier.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex pattern")
});

/// Normalizes an email address for use as part of a login identity
///
/// Leading and trailing whitespace is removed and the address is lower-cased.
///
/// # Examples
///
/// ```rust
/// use hostel_core::validation::normalize_email;
///
/// assert_eq!(normalize_email("  Student@Hostel.EDU "), "student@hostel.edu");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address
///
/// # Arguments
///
/// * `email` - The email address to validate
///
/// # Returns
///
/// Returns `Ok(())` if the email is valid, or a `ValidationError::InvalidEmail` if invalid.
///
/// # Examples
///
/// ```rust
/// use hostel_core::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(format!(
            "Invalid email format: {email}"
        )))
    }
}

/// Validates that a submitted password is present
///
/// Strength rules belong to the credential service; the login form only
/// needs something to verify.
pub fn validate_password_present(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    Ok(())
}
