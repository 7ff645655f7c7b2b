use std::net::SocketAddr;

use axum::{
    RequestPartsExt,
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, StatusCode, request::Parts},
};
use axum_extra::{TypedHeader, headers::UserAgent};

use crate::types::ConnectionInfo;

/// Address recorded when neither a forwarded header nor a peer address is
/// available.
pub const UNKNOWN_IP: &str = "unknown";

/// Client address used as the rate-limiting key.
///
/// Takes the first entry of `X-Forwarded-For` when the header is present and
/// non-empty, otherwise the direct peer address. The forwarded header is
/// trusted as sent, so deploy behind a proxy that overwrites it.
pub fn get_client_ip(headers: &HeaderMap, peer: Option<&SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => peer.map(|addr| addr.ip().to_string()),
    }
}

impl<S> FromRequestParts<S> for ConnectionInfo
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .extract::<Option<TypedHeader<UserAgent>>>()
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid user agent header"))?
            .map(|ua| ua.to_string());

        let peer = parts
            .extract::<ConnectInfo<SocketAddr>>()
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);

        let ip = get_client_ip(&parts.headers, peer.as_ref())
            .unwrap_or_else(|| UNKNOWN_IP.to_string());

        Ok(ConnectionInfo { ip, user_agent })
    }
}
