#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::DateTime;
use hostel::{AuthenticatedUser, CredentialVerifier, Error};
use hostel_core::ManualClock;

pub const EMAIL: &str = "student@hostel.edu";
pub const PASSWORD: &str = "correct horse battery";
pub const IP: &str = "203.0.113.7";

/// Accepts a single account and counts how often it was asked.
#[derive(Default)]
pub struct Accounts {
    calls: AtomicUsize,
}

impl Accounts {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for Accounts {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if email == EMAIL && password == PASSWORD {
            Ok(Some(
                AuthenticatedUser::new("student-1", email).with_name("Ada Student"),
            ))
        } else {
            Ok(None)
        }
    }
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
