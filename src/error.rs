//! Gateway error taxonomy.
//!
//! # Responsibilities
//! - Define the typed outcomes components return across boundaries
//! - Map each variant to a wire response at the axum edge (and nowhere else)
//!
//! # Design Decisions
//! - No panics or ad-hoc status codes inside components; everything funnels
//!   through this enum
//! - Counting-store faults are deliberately absent: the limiter handles them
//!   internally per its failure policy and they never reach the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Typed failure outcomes produced by the request pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Requested service name is not in the registry.
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    /// Client exceeded its per-window request quota.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Backend did not respond within the configured timeout.
    #[error("Service timeout")]
    GatewayTimeout,

    /// Transport-level failure reaching the backend (refused, DNS, reset).
    #[error("Service {0} unavailable")]
    ServiceUnavailable(String),

    /// Anything unexpected. Detail is logged server-side only.
    #[error("Internal server error")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status this variant maps to at the boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Internal(ref detail) = self {
            tracing::error!(detail = %detail, "Unhandled gateway fault");
        }
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
