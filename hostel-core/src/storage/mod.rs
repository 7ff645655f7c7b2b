//! Expiring key-value storage.
//!
//! The login attempt tracker keeps all of its state in a [`TtlStore`]. Every
//! process handling logins must reach the same store, so the tracker itself
//! holds no state between calls.

pub mod memory;

use async_trait::async_trait;
use chrono::Duration;

use crate::Error;

pub use memory::MemoryTtlStore;

/// A key-value store whose entries vanish after a time-to-live.
///
/// Values are opaque strings; callers serialize their own records. An entry
/// whose TTL has elapsed must be reported as absent by [`TtlStore::get`] even
/// if the backend has not physically removed it yet.
///
/// Absence is never an error. Errors are reserved for the store being
/// unreachable or failing, and callers propagate them.
#[async_trait]
pub trait TtlStore: Send + Sync + 'static {
    /// Fetch the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous entry and its TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Physically drop expired entries, returning how many were removed.
    ///
    /// Backends that evict on their own can keep the default.
    async fn purge_expired(&self) -> Result<u64, Error> {
        Ok(0)
    }

    /// Check that the store is reachable.
    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Prepare the backend schema. Schemaless backends keep the default.
    async fn migrate(&self) -> Result<(), Error> {
        Ok(())
    }
}
