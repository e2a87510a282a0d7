//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! DispatchTarget + inbound request parts
//!     → headers.rs (strip hop-by-hop set)
//!     → forwarder.rs (build target URI, send via pooled client, timeout)
//!     → Return: ProxyResult or GatewayTimeout / ServiceUnavailable
//! ```
//!
//! # Design Decisions
//! - Only two failure classes leave this subsystem: timeout and unavailable
//! - Response bytes are opaque; status and content-type are mirrored

pub mod forwarder;
pub mod headers;

pub use forwarder::{build_target, Forwarder, ProxyResult};
pub use headers::{strip_hop_by_hop, HOP_BY_HOP_HEADERS};
