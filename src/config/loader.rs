//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the asset store base URL.
pub const ASSETS_API_HOST: &str = "ASSETS_API_HOST";
/// Environment variable holding the resizer base URL.
pub const RESIZER_API_HOST: &str = "RESIZER_API_HOST";
/// Optional override for `listener.bind_address`.
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Optional override for `timeouts.upstream_secs`.
pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name} is not a valid number: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Load configuration using `lookup` to resolve environment variables.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    normalize(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`. Empty values are ignored.
fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(host) = get(ASSETS_API_HOST) {
        config.upstreams.assets_api_host = host;
    }
    if let Some(host) = get(RESIZER_API_HOST) {
        config.upstreams.resizer_api_host = host;
    }
    if let Some(addr) = get(BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(secs) = get(UPSTREAM_TIMEOUT_SECS) {
        config.timeouts.upstream_secs = secs.trim().parse().map_err(|_| ConfigError::Env {
            name: UPSTREAM_TIMEOUT_SECS,
            value: secs.clone(),
        })?;
    }

    Ok(())
}

/// Strip surrounding whitespace and trailing slashes from upstream bases.
fn normalize(config: &mut ProxyConfig) {
    for host in [
        &mut config.upstreams.assets_api_host,
        &mut config.upstreams.resizer_api_host,
    ] {
        *host = host.trim().trim_end_matches('/').to_string();
    }
}
