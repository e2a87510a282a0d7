//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages produce:
//!     → tracing events (structured log records, one per request from
//!       the timing interceptor)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing-subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The tracing subscriber is initialized once in main; modules emit
//!   through the `tracing` macros only
//! - Request IDs flow through the `x-request-id` header

pub mod metrics;
