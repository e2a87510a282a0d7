//! Path dispatch.
//!
//! # Responsibilities
//! - Split an inbound path into (service name, remaining path)
//! - Resolve the service against the registry
//!
//! # Design Decisions
//! - Pure parsing and lookup; no I/O
//! - Missing service is an explicit typed error, not a silent default
//! - Runs before the forwarder in the pipeline

use crate::error::GatewayError;
use crate::routing::registry::ServiceRegistry;

/// A resolved dispatch target.
#[derive(Debug, PartialEq, Eq)]
pub struct DispatchTarget<'a> {
    /// Service name taken from the first path segment.
    pub service: &'a str,
    /// Backend base URL from the registry.
    pub base_url: &'a str,
    /// Remainder of the path after the service segment (may be empty,
    /// never starts with '/').
    pub rest: &'a str,
}

/// Split a request path into its first segment and the remainder.
///
/// Returns `None` for the root path or a path without a first segment.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once('/') {
        Some((service, rest)) => Some((service, rest)),
        None => Some((trimmed, "")),
    }
}

/// Resolve a request path to a dispatch target.
pub fn route<'a>(
    registry: &'a ServiceRegistry,
    path: &'a str,
) -> Result<DispatchTarget<'a>, GatewayError> {
    let (service, rest) =
        split_path(path).ok_or_else(|| GatewayError::ServiceNotFound(String::new()))?;

    let base_url = registry
        .resolve(service)
        .ok_or_else(|| GatewayError::ServiceNotFound(service.to_string()))?;

    Ok(DispatchTarget {
        service,
        base_url,
        rest,
    })
}
