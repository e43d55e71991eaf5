use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header::USER_AGENT, request::Parts, Extensions, HeaderMap},
};

use crate::services::ClientInfo;

/// Caller address and agent as recorded in the audit tables
pub struct RequestClient(pub ClientInfo);

#[async_trait]
impl<S> FromRequestParts<S> for RequestClient
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestClient(client_info(&parts.headers, &parts.extensions)))
    }
}

/// X-Forwarded-For (first hop), then X-Real-IP, then the peer address
pub fn client_info(headers: &HeaderMap, extensions: &Extensions) -> ClientInfo {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let ip = forwarded.or(real_ip).map(str::to_string).or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    });

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_string);

    ClientInfo { ip, user_agent }
}
