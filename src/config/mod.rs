//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overlay (ASSETS_API_HOST, RESIZER_API_HOST, ...)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed by value to the HTTP server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reads the environment at request time
//! - All optional fields have defaults; the two upstream hosts do not
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
