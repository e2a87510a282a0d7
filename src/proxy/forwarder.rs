//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Build the target URI from base URL, remaining path, and query
//! - Send the outbound request through the pooled client under a timeout
//! - Normalize the backend response into a ProxyResult
//! - Classify failures as timeout or unavailable; nothing else
//!
//! # Design Decisions
//! - One pooled hyper client shared by all requests (connection reuse,
//!   bounded resource growth)
//! - The timeout covers the whole exchange including the body read
//! - Body bytes pass through unmodified; no re-serialization
//! - No retries; backoff is the client's concern

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::schema::{LimitsConfig, TimeoutConfig};
use crate::error::GatewayError;
use crate::proxy::headers::strip_hop_by_hop;

/// Normalized backend response handed back up the pipeline.
#[derive(Debug)]
pub struct ProxyResult {
    pub body: Bytes,
    pub status: StatusCode,
    pub content_type: String,
}

/// Forwards requests to backends over a shared connection pool.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig, limits: &LimitsConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            request_timeout: Duration::from_secs(timeouts.request_secs),
            max_body_bytes: limits.max_body_bytes,
        }
    }

    /// Forward one request to `base_url`/`rest` and normalize the result.
    #[allow(clippy::too_many_arguments)]
    pub async fn forward(
        &self,
        service: &str,
        base_url: &str,
        rest: &str,
        method: Method,
        inbound_headers: &HeaderMap,
        query: Option<&str>,
        body: Bytes,
    ) -> Result<ProxyResult, GatewayError> {
        let target = build_target(base_url, rest, query)?;

        tracing::info!(service = %service, target = %target, "Forwarding request");

        let mut builder = Request::builder().method(method).uri(target);
        if let Some(headers) = builder.headers_mut() {
            *headers = strip_hop_by_hop(inbound_headers);
        }
        let request = builder
            .body(Body::from(body))
            .map_err(|e| GatewayError::Internal(format!("failed to build outbound request: {}", e)))?;

        let exchange = async {
            let response: hyper::Response<hyper::body::Incoming> =
                self.client.request(request).await.map_err(|e| {
                    tracing::error!(service = %service, error = %e, "Error calling backend");
                    GatewayError::ServiceUnavailable(service.to_string())
                })?;

            let status = response.status();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/json")
                .to_string();

            let body = axum::body::to_bytes(Body::new(response.into_body()), self.max_body_bytes)
                .await
                .map_err(|e| {
                    tracing::error!(service = %service, error = %e, "Error reading backend response body");
                    GatewayError::ServiceUnavailable(service.to_string())
                })?;

            tracing::info!(service = %service, status = %status, "Response from backend");

            Ok(ProxyResult {
                body,
                status,
                content_type,
            })
        };

        match timeout(self.request_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(service = %service, timeout_secs = self.request_timeout.as_secs(), "Timeout calling backend");
                Err(GatewayError::GatewayTimeout)
            }
        }
    }
}

/// Join base URL, remaining path, and query into the target URI.
/// The separator is omitted when the remainder is empty.
pub fn build_target(base_url: &str, rest: &str, query: Option<&str>) -> Result<Uri, GatewayError> {
    let mut target = if rest.is_empty() {
        base_url.to_string()
    } else {
        format!("{}/{}", base_url, rest)
    };
    if let Some(query) = query {
        if !query.is_empty() {
            target.push('?');
            target.push_str(query);
        }
    }
    target
        .parse::<Uri>()
        .map_err(|e| GatewayError::Internal(format!("invalid target URI '{}': {}", target, e)))
}
