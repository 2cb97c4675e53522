//! Per-request deadline.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pantry_resilience::deadline;
use std::time::Duration;
use tracing::warn;

/// Aborts the inner handler once `timeout` elapses.
///
/// Detached work the handler already spawned, such as cache population,
/// keeps running.
pub async fn timeout_middleware(
    State(timeout): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let uri = request.uri().clone();

    match deadline(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(uri = %uri, timeout_ms = timeout.as_millis(), "Request deadline exceeded");
            AppError(e).into_response()
        }
    }
}
