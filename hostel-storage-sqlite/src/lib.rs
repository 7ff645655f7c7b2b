//! SQLite backend for [`TtlStore`].
//!
//! Entries live in a single `ttl_entries` table with an absolute expiry in
//! epoch milliseconds. SQLite has no native eviction, so reads filter out
//! expired rows and [`TtlStore::purge_expired`] deletes them; the tracker's
//! cleanup task calls it periodically.

pub mod migrations;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use hostel_core::{
    Clock, Error, SystemClock, TtlStore,
    error::{StorageError, utilities::DatabaseResultExt},
};
use sqlx::SqlitePool;

use crate::migrations::{MIGRATIONS, SqliteMigrationManager};

pub struct SqliteTtlStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteTtlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
        }
    }

    /// Connect to the SQLite database at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - SQLite connection URL (e.g., "sqlite::memory:" or "sqlite://path/to/db.sqlite?mode=rwc")
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = SqlitePool::connect(url).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to SQLite");
            StorageError::Connection(e.to_string())
        })?;
        Ok(Self::new(pool))
    }

    /// Use `clock` to compute and check expiry instead of wall-clock time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn now_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }
}

#[async_trait]
impl TtlStore for SqliteTtlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM ttl_entries WHERE key = ? AND expires_at > ?",
        )
        .bind(key)
        .bind(self.now_millis())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to read ttl entry")
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let expires_at = self.now_millis() + ttl.num_milliseconds();

        sqlx::query(
            r#"
            INSERT INTO ttl_entries (key, value, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_db_err_with_context("Failed to write ttl entry")?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM ttl_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to delete ttl entry")?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM ttl_entries WHERE expires_at <= ?")
            .bind(self.now_millis())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to purge expired ttl entries")?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }

    /// Create the `ttl_entries` table if it does not exist yet.
    async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await?;
        manager.up(MIGRATIONS).await?;
        Ok(())
    }
}
