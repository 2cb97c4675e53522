//! Per-client request rate limiting.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pantry_resilience::RateLimiter;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

/// Rejects requests with 429 once the calling IP has used up its quota.
///
/// Requests without connection info share the bucket of `0.0.0.0`.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| addr.ip());

    if let Err(e) = limiter.check(client) {
        warn!(%client, method = %request.method(), uri = %request.uri(), "Rate limit exceeded");
        return AppError(e).into_response();
    }

    next.run(request).await
}
