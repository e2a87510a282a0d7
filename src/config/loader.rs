//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides for the common deployment knobs.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: GatewayConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration purely from defaults plus environment overrides.
/// Used when no config file is supplied.
pub fn config_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Ok(addr) = std::env::var("GATEWAY_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Ok(url) = std::env::var("GATEWAY_REDIS_URL") {
        config.redis.url = url;
    }
    if let Ok(limit) = std::env::var("GATEWAY_RATE_LIMIT_PER_MINUTE") {
        if let Ok(limit) = limit.parse() {
            config.rate_limit.requests_per_window = limit;
        }
    }
    if let Ok(timeout) = std::env::var("GATEWAY_REQUEST_TIMEOUT_SECS") {
        if let Ok(timeout) = timeout.parse() {
            config.timeouts.request_secs = timeout;
        }
    }
    // GATEWAY_SERVICE_<NAME>=<url> adds or replaces one service entry.
    for (key, value) in std::env::vars() {
        if let Some(name) = key.strip_prefix("GATEWAY_SERVICE_") {
            if !name.is_empty() {
                config.services.insert(name.to_lowercase(), value);
            }
        }
    }
}
