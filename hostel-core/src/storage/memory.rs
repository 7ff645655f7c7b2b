//! In-process [`TtlStore`] backed by a concurrent hash map.
//!
//! Suitable for tests and single-instance deployments. Entries expire
//! according to the injected [`Clock`], so simulated time applies to eviction
//! as well as to the tracker's own timestamp checks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::{
    Error,
    clock::{Clock, SystemClock},
    storage::TtlStore,
};

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct MemoryTtlStore {
    entries: DashMap<String, MemoryEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryTtlStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryTtlStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtlStore for MemoryTtlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let now = self.clock.now();

        // remove_if so a concurrent set between the check and the removal survives
        if self
            .entries
            .remove_if(key, |_, entry| entry.expires_at <= now)
            .is_some()
        {
            return Ok(None);
        }

        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store_with_clock() -> (MemoryTtlStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (MemoryTtlStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let store = MemoryTtlStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryTtlStore::new();
        store
            .set("login_lockout:abc", "{\"x\":1}", Duration::seconds(60))
            .await
            .unwrap();
        assert_eq!(
            store.get("login_lockout:abc").await.unwrap().as_deref(),
            Some("{\"x\":1}")
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_value_and_ttl() {
        let (store, clock) = store_with_clock();
        store.set("k", "one", Duration::seconds(10)).await.unwrap();
        store.set("k", "two", Duration::seconds(100)).await.unwrap();

        clock.advance(Duration::seconds(50));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (store, clock) = store_with_clock();
        store.set("k", "v", Duration::seconds(900)).await.unwrap();

        clock.advance(Duration::seconds(899));
        assert!(store.get("k").await.unwrap().is_some());

        clock.advance(Duration::seconds(1));
        assert_eq!(store.get("k").await.unwrap(), None);
        // Expired entries are evicted on read
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryTtlStore::new();
        store.set("k", "v", Duration::seconds(60)).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_expired_counts_removed_entries() {
        let (store, clock) = store_with_clock();
        store.set("short", "v", Duration::seconds(10)).await.unwrap();
        store.set("long", "v", Duration::seconds(1000)).await.unwrap();

        clock.advance(Duration::seconds(11));
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").await.unwrap().is_some());
    }
}
