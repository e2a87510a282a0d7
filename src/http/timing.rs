//! Request timing interceptor.
//!
//! # Responsibilities
//! - Measure wall-clock duration of the dispatch + forward stages
//! - Emit one log record per processed request (success or failure)
//! - Attach the elapsed time to the response as X-Process-Time
//!
//! # Design Decisions
//! - Runs inside the rate limiter: rejected requests never reach it and
//!   produce no timing record
//! - Never alters the status or body produced downstream

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// Response header carrying elapsed processing time in seconds.
pub const X_PROCESS_TIME: &str = "x-process-time";

/// Middleware that times the downstream stages and logs the outcome.
pub async fn timing_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!(
        client = %addr.ip(),
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_secs = elapsed,
        "Request processed"
    );

    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed)) {
        response.headers_mut().insert(X_PROCESS_TIME, value);
    }
    response
}
