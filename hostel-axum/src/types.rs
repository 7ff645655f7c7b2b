use hostel::AuthenticatedUser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Where a request came from.
///
/// `ip` is the rate-limiting address: the first `X-Forwarded-For` entry when
/// present, else the peer address, else `"unknown"`.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub ip: String,
    pub user_agent: Option<String>,
}
