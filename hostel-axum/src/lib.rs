//! # Hostel Axum Integration
//!
//! This crate provides Axum routes for the hostel login endpoint with lockout
//! protection. Failed logins are counted per email and client address; after
//! repeated failures the endpoint answers `429 Too Many Requests` with a
//! `Retry-After` header until the lockout ends.
//!
//! ## Routes
//!
//! - `POST /login` with a JSON `{ "email", "password" }` body
//! - `GET /health`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::{net::SocketAddr, sync::Arc};
//! use axum::Router;
//! use hostel::HostelBuilder;
//! # use hostel::{AuthenticatedUser, CredentialVerifier, Error};
//! # struct Accounts;
//! # #[async_trait::async_trait]
//! # impl CredentialVerifier for Accounts {
//! #     async fn verify(&self, _: &str, _: &str) -> Result<Option<AuthenticatedUser>, Error> {
//! #         Ok(None)
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hostel = Arc::new(
//!         HostelBuilder::new()
//!             .with_memory_store()
//!             .build(Accounts)
//!             .await?,
//!     );
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     hostel.start_cleanup_task(shutdown_rx);
//!
//!     let app = Router::new().nest("/auth", hostel_axum::routes(hostel));
//!
//!     // The peer address is needed when no proxy sets X-Forwarded-For
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(
//!         listener,
//!         app.into_make_service_with_connect_info::<SocketAddr>(),
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

mod error;
mod extractors;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use extractors::{UNKNOWN_IP, get_client_ip};
pub use routes::{LoginState, create_router};
pub use types::{ConnectionInfo, HealthResponse, LoginRequest, LoginResponse};

use axum::Router;
use hostel::{CredentialVerifier, Hostel, TtlStore};
use std::sync::Arc;

/// Create login routes for your Axum application.
///
/// # Arguments
///
/// * `hostel` - An Arc-wrapped Hostel instance configured with your store
///
/// # Returns
///
/// A Router that can be nested into your application at any path (e.g., "/auth")
pub fn routes<S, V>(hostel: Arc<Hostel<S, V>>) -> Router
where
    S: TtlStore,
    V: CredentialVerifier,
{
    create_router(hostel)
}
