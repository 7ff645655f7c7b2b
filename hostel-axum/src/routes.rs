use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use hostel::{CredentialVerifier, Hostel, LoginOutcome, TtlStore};

use crate::{
    error::{ApiError, Result},
    types::*,
};

pub struct LoginState<S: TtlStore, V: CredentialVerifier> {
    pub hostel: Arc<Hostel<S, V>>,
}

impl<S: TtlStore, V: CredentialVerifier> Clone for LoginState<S, V> {
    fn clone(&self) -> Self {
        Self {
            hostel: self.hostel.clone(),
        }
    }
}

pub fn create_router<S, V>(hostel: Arc<Hostel<S, V>>) -> Router
where
    S: TtlStore,
    V: CredentialVerifier,
{
    let state = LoginState { hostel };

    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .with_state(state)
}

async fn health_handler<S, V>(State(state): State<LoginState<S, V>>) -> Result<impl IntoResponse>
where
    S: TtlStore,
    V: CredentialVerifier,
{
    state.hostel.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable
    })?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

async fn login_handler<S, V>(
    State(state): State<LoginState<S, V>>,
    connection_info: ConnectionInfo,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    S: TtlStore,
    V: CredentialVerifier,
{
    let Json(payload) = payload?;

    tracing::debug!(
        ip = %connection_info.ip,
        user_agent = connection_info.user_agent.as_deref().unwrap_or("-"),
        "Login request"
    );

    let outcome = state
        .hostel
        .login(&payload.email, &payload.password, &connection_info.ip)
        .await?;

    let message = outcome.message();
    match outcome {
        LoginOutcome::Authenticated(user) => {
            Ok((StatusCode::OK, Json(LoginResponse { message, user })))
        }
        LoginOutcome::LockedOut {
            retry_after_seconds,
        }
        | LoginOutcome::Rejected {
            became_locked: true,
            lockout_seconds: retry_after_seconds,
            ..
        } => Err(ApiError::LockedOut {
            message,
            retry_after_seconds,
        }),
        LoginOutcome::Rejected {
            remaining_attempts, ..
        } => Err(ApiError::InvalidCredentials {
            message,
            remaining_attempts,
        }),
    }
}
