//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required upstream hosts are present and are absolute URLs
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required setting has no value.
    #[error("{name} is required")]
    Missing { name: &'static str },

    /// An upstream host is not an absolute URL with a host.
    #[error("{name} must be an absolute URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },

    /// A socket address failed to parse.
    #[error("{name} is not a valid socket address: {value:?}")]
    InvalidAddress { name: &'static str, value: String },

    /// A timeout was configured as zero.
    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_host(
        "ASSETS_API_HOST",
        &config.upstreams.assets_api_host,
        &mut errors,
    );
    check_host(
        "RESIZER_API_HOST",
        &config.upstreams.resizer_api_host,
        &mut errors,
    );

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            name: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            name: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            name: "timeouts.upstream_secs",
        });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            name: "timeouts.connect_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_host(name: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Missing { name });
        return;
    }

    let absolute = Url::parse(value)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false);
    if !absolute {
        errors.push(ValidationError::InvalidUrl {
            name,
            value: value.to_string(),
        });
    }
}
