//! Static service registry.
//!
//! # Responsibilities
//! - Hold the name → backend base URL mapping
//! - Resolve a service name to its base URL
//!
//! # Design Decisions
//! - Built once at startup from validated config, immutable afterward
//! - Shared via Arc across all request tasks; no locking needed
//! - Trailing slashes on base URLs are normalized away so target joining
//!   is uniform in the forwarder

use std::collections::HashMap;

/// Immutable mapping from service name to backend base URL.
#[derive(Debug)]
pub struct ServiceRegistry {
    services: HashMap<String, String>,
}

impl ServiceRegistry {
    /// Build the registry from a configuration map.
    pub fn from_config(services: &HashMap<String, String>) -> Self {
        let services = services
            .iter()
            .map(|(name, url)| (name.clone(), url.trim_end_matches('/').to_string()))
            .collect();
        Self { services }
    }

    /// Resolve a service name to its base URL.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.services.get(name).map(String::as_str)
    }

    /// Names of all registered services, sorted for stable output.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True when no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
