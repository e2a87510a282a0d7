//! Fixed-window rate limiter.
//!
//! # Responsibilities
//! - Decide admit/reject per client per time window
//! - Key counts by (client, window index) in the counting store
//! - Apply the configured failure policy when the store errors
//!
//! # Design Decisions
//! - Fixed-window counting: a client can burst up to 2× the limit across
//!   a window boundary; accepted approximation, not a sliding window
//! - Fails open by default: a counting-store outage must not take down
//!   traffic, the limiter is protective, not a correctness guarantee
//! - Store faults never surface to the client

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::schema::{FailurePolicy, RateLimitConfig};
use crate::limit::store::{CounterStore, StoreError};
use crate::observability::metrics;

/// Outcome of an admission check. Produced and consumed within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Admit,
    Reject,
}

/// Per-client fixed-window request limiter backed by a counting store.
pub struct FixedWindowLimiter {
    store: Arc<dyn CounterStore>,
    limit: u32,
    window: Duration,
    failure_policy: FailurePolicy,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            limit: config.requests_per_window,
            window: Duration::from_secs(config.window_secs),
            failure_policy: config.failure_policy,
        }
    }

    /// Check whether a request from `client_id` may proceed right now.
    pub async fn admit(&self, client_id: &str) -> RateLimitDecision {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.admit_at(client_id, now_secs).await
    }

    /// Admission check at an explicit unix timestamp (seconds).
    pub async fn admit_at(&self, client_id: &str, now_secs: u64) -> RateLimitDecision {
        let window_id = now_secs / self.window.as_secs().max(1);
        let key = format!("rate_limit:{}:{}", client_id, window_id);

        match self.store.get(&key).await {
            Ok(Some(count)) if count >= u64::from(self.limit) => {
                tracing::warn!(client = %client_id, count, limit = self.limit, "Rate limit exceeded");
                metrics::record_rate_limited();
                RateLimitDecision::Reject
            }
            Ok(_) => match self.store.increment_and_expire(&key, self.window).await {
                Ok(_) => RateLimitDecision::Admit,
                Err(e) => self.on_store_error(client_id, e),
            },
            Err(e) => self.on_store_error(client_id, e),
        }
    }

    fn on_store_error(&self, client_id: &str, error: StoreError) -> RateLimitDecision {
        tracing::error!(client = %client_id, error = %error, "Counting store error during rate limiting");
        metrics::record_store_fault();
        match self.failure_policy {
            FailurePolicy::Open => RateLimitDecision::Admit,
            FailurePolicy::Closed => {
                metrics::record_rate_limited();
                RateLimitDecision::Reject
            }
        }
    }
}
