//! Outbound header preparation.
//!
//! # Responsibilities
//! - Derive forwardable headers from the inbound set
//! - Strip hop-by-hop headers that must not cross the proxy boundary
//!
//! # Design Decisions
//! - Removal is compared case-insensitively; everything else passes
//!   through untouched (authorization and content-type included)
//! - content-length and host are dropped too: the client recomputes
//!   length and sets host for the backend authority

use axum::http::HeaderMap;

/// Headers meaningful only for a single transport connection.
pub const HOP_BY_HOP_HEADERS: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "content-length",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Build the outbound header set: the inbound headers minus the
/// hop-by-hop set.
pub fn strip_hop_by_hop(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if !is_hop_by_hop(name.as_str()) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}
