use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use hostel_core::error::{AuthError, Error};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidCredentials {
        message: String,
        remaining_attempts: u32,
    },

    #[error("{message}")]
    LockedOut {
        message: String,
        retry_after_seconds: i64,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            // Fail closed: never let a login through when lockout state is unknown
            Error::Storage(e) => {
                tracing::error!(error = %e, "Login store unavailable");
                ApiError::ServiceUnavailable
            }
            Error::Auth(AuthError::Verifier(msg)) => ApiError::InternalError(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            ApiError::LockedOut { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = json!({
            "error": self.to_string(),
            "code": status.as_u16()
        });

        match self {
            ApiError::InvalidCredentials {
                remaining_attempts, ..
            } => {
                body["remaining_attempts"] = json!(remaining_attempts);
                (status, Json(body)).into_response()
            }
            ApiError::LockedOut {
                retry_after_seconds,
                ..
            } => {
                body["retry_after"] = json!(retry_after_seconds);
                let mut response = (status, Json(body)).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            ApiError::InternalError(ref msg) => {
                tracing::error!(error = %msg, "Login failed unexpectedly");
                (status, Json(json!({"error": "Internal server error", "code": status.as_u16()})))
                    .into_response()
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
