use chrono::Utc;
use hostel_core::{Error, error::utilities::DatabaseResultExt};
use sqlx::SqlitePool;

/// A schema change applied once per database, in version order.
pub struct SqliteMigration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static [&'static str],
    pub down: &'static [&'static str],
}

/// Migrations for the TTL store, oldest first.
pub const MIGRATIONS: &[SqliteMigration] = &[SqliteMigration {
    version: 1,
    name: "CreateTtlEntriesTable",
    up: &[
        r#"
        CREATE TABLE IF NOT EXISTS ttl_entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        );"#,
        "CREATE INDEX IF NOT EXISTS idx_ttl_entries_expires_at ON ttl_entries(expires_at);",
    ],
    down: &[
        "DROP INDEX IF EXISTS idx_ttl_entries_expires_at;",
        "DROP TABLE IF EXISTS ttl_entries;",
    ],
}];

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn get_migration_table_name(&self) -> &str {
        "_hostel_migrations"
    }

    /// Initialize migration tracking table
    pub async fn initialize(&self) -> Result<(), Error> {
        sqlx::query(
            format!(
                r#"
            CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT (unixepoch())
            );"#,
                self.get_migration_table_name()
            )
            .as_str(),
        )
        .execute(&self.pool)
        .await
        .map_db_err_with_context("Failed to create migration table")?;

        Ok(())
    }

    /// Apply pending migrations
    pub async fn up(&self, migrations: &[SqliteMigration]) -> Result<(), Error> {
        for migration in migrations {
            if self.is_applied(migration.version).await? {
                continue;
            }

            let mut tx = self
                .pool
                .begin()
                .await
                .map_db_err_with_context("Failed to begin migration")?;

            tracing::info!(
                "Applying migration {} ({})",
                migration.name,
                migration.version
            );

            for statement in migration.up {
                sqlx::query(*statement)
                    .execute(&mut *tx)
                    .await
                    .map_db_err_with_context(migration.name)?;
            }

            sqlx::query(
                format!(
                    "INSERT INTO {} (version, name, applied_at) VALUES (?, ?, ?)",
                    self.get_migration_table_name()
                )
                .as_str(),
            )
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .map_db_err_with_context("Failed to record migration")?;

            tx.commit()
                .await
                .map_db_err_with_context("Failed to commit migration")?;
        }
        Ok(())
    }

    /// Roll back applied migrations, newest first
    pub async fn down(&self, migrations: &[SqliteMigration]) -> Result<(), Error> {
        for migration in migrations.iter().rev() {
            if !self.is_applied(migration.version).await? {
                continue;
            }

            let mut tx = self
                .pool
                .begin()
                .await
                .map_db_err_with_context("Failed to begin rollback")?;

            tracing::info!(
                "Rolling back migration {} ({})",
                migration.name,
                migration.version
            );

            for statement in migration.down {
                sqlx::query(*statement)
                    .execute(&mut *tx)
                    .await
                    .map_db_err_with_context(migration.name)?;
            }

            sqlx::query(
                format!(
                    "DELETE FROM {} WHERE version = ?",
                    self.get_migration_table_name()
                )
                .as_str(),
            )
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_db_err_with_context("Failed to remove migration record")?;

            tx.commit()
                .await
                .map_db_err_with_context("Failed to commit rollback")?;
        }
        Ok(())
    }

    /// Check if specific migration was applied
    pub async fn is_applied(&self, version: i64) -> Result<bool, Error> {
        let result: bool = sqlx::query_scalar(
            format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE version = ?)",
                self.get_migration_table_name()
            )
            .as_str(),
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await
        .map_db_err_with_context("Failed to check migration")?;

        Ok(result)
    }
}
