//! End-to-end login flow through the Hostel facade.

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{Accounts, EMAIL, IP, PASSWORD, manual_clock};
use hostel::{HostelBuilder, LoginOutcome};

#[tokio::test]
async fn test_lockout_cycle() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let clock = manual_clock();
    let accounts = Arc::new(Accounts::default());
    let hostel = HostelBuilder::new()
        .with_clock(clock.clone())
        .with_memory_store()
        .build(accounts.clone())
        .await?;

    for expected_remaining in [4, 3, 2, 1] {
        match hostel.login(EMAIL, "guess", IP).await? {
            LoginOutcome::Rejected {
                became_locked: false,
                remaining_attempts,
                ..
            } => assert_eq!(remaining_attempts, expected_remaining),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    let locking = hostel.login(EMAIL, "guess", IP).await?;
    assert_eq!(locking.retry_after_seconds(), Some(900));
    assert_eq!(
        locking.message(),
        "Too many failed attempts. Your account is temporarily locked."
    );

    // The right password does not help while locked, and is never checked
    clock.advance(Duration::minutes(5));
    let locked = hostel.login(EMAIL, PASSWORD, IP).await?;
    assert_eq!(
        locked,
        LoginOutcome::LockedOut {
            retry_after_seconds: 600
        }
    );
    assert_eq!(
        locked.message(),
        "Too many failed login attempts. Try again in 10 minute(s)."
    );
    assert_eq!(accounts.calls(), 5);

    // Other addresses are unaffected
    assert!(
        hostel
            .login(EMAIL, PASSWORD, "198.51.100.2")
            .await?
            .is_authenticated()
    );

    clock.advance(Duration::minutes(10));
    let outcome = hostel.login(EMAIL, PASSWORD, IP).await?;
    match outcome {
        LoginOutcome::Authenticated(user) => {
            assert_eq!(user.email, EMAIL);
            assert_eq!(user.name.as_deref(), Some("Ada Student"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(
        hostel
            .login_attempts()
            .get_remaining_attempts(EMAIL, IP)
            .await?,
        5
    );

    Ok(())
}

#[tokio::test]
async fn test_email_case_and_whitespace_share_identity() -> Result<(), Box<dyn std::error::Error>> {
    let hostel = HostelBuilder::new()
        .with_memory_store()
        .build(Accounts::default())
        .await?;

    hostel.login("Student@Hostel.edu", "guess", IP).await?;
    hostel.login(" student@hostel.edu ", "guess", IP).await?;

    assert_eq!(
        hostel
            .login_attempts()
            .get_remaining_attempts(EMAIL, IP)
            .await?,
        3
    );
    Ok(())
}

#[tokio::test]
async fn test_validation_errors_do_not_count() {
    let hostel = HostelBuilder::new()
        .with_memory_store()
        .build(Accounts::default())
        .await
        .unwrap();

    for _ in 0..10 {
        let err = hostel.login("", "guess", IP).await.unwrap_err();
        assert!(err.is_validation_error());
    }

    assert!(
        hostel
            .login(EMAIL, PASSWORD, IP)
            .await
            .unwrap()
            .is_authenticated()
    );
}

#[tokio::test]
async fn test_outcome_serializes_user() {
    let hostel = HostelBuilder::new()
        .with_memory_store()
        .build(Accounts::default())
        .await
        .unwrap();

    let LoginOutcome::Authenticated(user) = hostel.login(EMAIL, PASSWORD, IP).await.unwrap()
    else {
        panic!("expected a successful login");
    };

    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        serde_json::json!({
            "id": "student-1",
            "email": "student@hostel.edu",
            "name": "Ada Student"
        })
    );
}
