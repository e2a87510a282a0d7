//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check service base URLs are absolute http(s) URLs
//! - Validate value ranges (limits and timeouts nonzero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GatewayConfig;
use url::Url;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Service base URL failed to parse or has an unsupported scheme.
    InvalidServiceUrl { name: String, url: String },
    /// Service name is empty or contains a path separator.
    InvalidServiceName(String),
    /// A numeric setting that must be nonzero is zero.
    ZeroValue(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidServiceUrl { name, url } => {
                write!(f, "service '{}' has invalid base URL '{}'", name, url)
            }
            ValidationError::InvalidServiceName(name) => {
                write!(f, "invalid service name '{}'", name)
            }
            ValidationError::ZeroValue(field) => {
                write!(f, "{} must be greater than zero", field)
            }
        }
    }
}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, base_url) in &config.services {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::InvalidServiceName(name.clone()));
        }
        match Url::parse(base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push(ValidationError::InvalidServiceUrl {
                name: name.clone(),
                url: base_url.clone(),
            }),
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_window == 0 {
            errors.push(ValidationError::ZeroValue("rate_limit.requests_per_window"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroValue("rate_limit.window_secs"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue("limits.max_body_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_service(name: &str, url: &str) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.services.insert(name.to_string(), url.to_string());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        let config = config_with_service("auth", "http://localhost:8001");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_url_rejected() {
        let config = config_with_service("auth", "not a url");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidServiceUrl {
                name: "auth".into(),
                url: "not a url".into()
            }]
        );
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = config_with_service("auth", "ftp://localhost:8001");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = config_with_service("", "nope");
        config.rate_limit.requests_per_window = 0;
        config.timeouts.request_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_zero_limit_ignored_when_disabled() {
        let mut config = config_with_service("auth", "http://localhost:8001");
        config.rate_limit.enabled = false;
        config.rate_limit.requests_per_window = 0;
        assert!(validate_config(&config).is_ok());
    }
}
