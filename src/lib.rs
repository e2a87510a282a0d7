//! API Gateway Library
//!
//! An HTTP gateway in front of a fixed set of named backend services.
//! Requests are forwarded to the matching backend by path prefix; backends
//! are protected from overload by per-client fixed-window rate limiting
//! backed by a shared counting store.

pub mod config;
pub mod error;
pub mod http;
pub mod limit;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
