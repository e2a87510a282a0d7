//! Request ID generation.
//!
//! # Responsibilities
//! - Assign a UUID v4 x-request-id to requests that arrive without one
//! - Propagate the ID onto the response (wired up in the server layers)
//!
//! # Design Decisions
//! - IDs are set as early as possible so every log line can carry one

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Canonical request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 per request for SetRequestIdLayer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeGatewayRequestId;

impl MakeRequestId for MakeGatewayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
