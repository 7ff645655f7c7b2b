//! Tests for the Hostel builder pattern

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{Accounts, EMAIL, IP, PASSWORD};
use hostel::{HostelBuilder, HostelBuilderError, LoginAttemptConfig, MemoryTtlStore};

#[tokio::test]
async fn test_builder_with_memory_store() {
    let hostel = HostelBuilder::new()
        .with_memory_store()
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    hostel.health_check().await.expect("Health check failed");
    assert!(
        hostel
            .login(EMAIL, PASSWORD, IP)
            .await
            .unwrap()
            .is_authenticated()
    );
}

#[tokio::test]
async fn test_builder_with_existing_store() {
    let store = Arc::new(MemoryTtlStore::new());

    let hostel = HostelBuilder::new()
        .with_store(store.clone())
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    hostel.login(EMAIL, "wrong", IP).await.unwrap();
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_builder_with_login_attempt_config() {
    let hostel = HostelBuilder::new()
        .with_memory_store()
        .with_login_attempt_config(LoginAttemptConfig {
            max_attempts: 2,
            lockout_duration: Duration::minutes(5),
            attempt_window: Duration::minutes(5),
        })
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    assert_eq!(
        hostel
            .login_attempts()
            .get_remaining_attempts(EMAIL, IP)
            .await
            .unwrap(),
        2
    );

    hostel.login(EMAIL, "wrong", IP).await.unwrap();
    let outcome = hostel.login(EMAIL, "wrong", IP).await.unwrap();
    assert_eq!(outcome.retry_after_seconds(), Some(300));
}

#[tokio::test]
async fn test_builder_rejects_invalid_config() {
    let result = HostelBuilder::new()
        .with_memory_store()
        .with_login_attempt_config(LoginAttemptConfig {
            max_attempts: 0,
            ..LoginAttemptConfig::default()
        })
        .build(Accounts::default())
        .await;

    assert!(matches!(
        result,
        Err(HostelBuilderError::InvalidConfiguration(_))
    ));
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_builder_with_sqlite() {
    let hostel = HostelBuilder::new()
        .with_sqlite("sqlite::memory:")
        .await
        .expect("Failed to connect to SQLite")
        .apply_migrations(true)
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    hostel.health_check().await.expect("Health check failed");
    assert!(
        hostel
            .login(EMAIL, PASSWORD, IP)
            .await
            .unwrap()
            .is_authenticated()
    );
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_builder_with_sqlite_pool() {
    // A single connection so every query sees the same in-memory database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to SQLite");

    let hostel = HostelBuilder::new()
        .with_sqlite_pool(pool)
        .apply_migrations(true)
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    hostel.login(EMAIL, "wrong", IP).await.unwrap();
    assert_eq!(
        hostel
            .login_attempts()
            .get_remaining_attempts(EMAIL, IP)
            .await
            .unwrap(),
        4
    );
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_builder_manual_migration() {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to SQLite");

    let hostel = HostelBuilder::new()
        .with_sqlite_pool(pool)
        .build(Accounts::default())
        .await
        .expect("Failed to build Hostel");

    // Without the schema the store fails closed
    let err = hostel.login(EMAIL, PASSWORD, IP).await.unwrap_err();
    assert!(err.is_storage_error());

    hostel.migrate().await.expect("Migration failed");
    assert!(
        hostel
            .login(EMAIL, PASSWORD, IP)
            .await
            .unwrap()
            .is_authenticated()
    );
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_builder_with_invalid_sqlite_url() {
    let result = HostelBuilder::new()
        .with_sqlite("postgres://not-sqlite")
        .await;

    assert!(matches!(
        result,
        Err(HostelBuilderError::StorageConnection(_))
    ));
}
