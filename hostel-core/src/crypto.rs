//! Hashing helpers for cache keys.
//!
//! Login attempt state is keyed by a truncated SHA256 digest of the
//! `email:ip` pair. The digest bounds key length and keeps raw email
//! addresses out of the cache and out of logs. It is not a security boundary.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA256 digest.
pub const IDENTITY_DIGEST_LEN: usize = 16;

/// Hash a value with SHA256 and return the full hex encoding.
///
/// # Arguments
///
/// * `value` - The plaintext to hash
///
/// # Returns
///
/// A 64 character lowercase hex string
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Digest identifying an (email, IP) pair.
///
/// The input is `email + ":" + ip` exactly as supplied; callers normalize the
/// email before calling.
pub fn identity_digest(email: &str, ip_address: &str) -> String {
    let mut digest = sha256_hex(&format!("{email}:{ip_address}"));
    digest.truncate(IDENTITY_DIGEST_LEN);
    digest
}
