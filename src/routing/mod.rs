//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Decoded asset path + query (type, w, h)
//!     → media.rs (fallback Content-Type from extension)
//!     → resolver.rs (asset host, absolute URL, or resizer)
//!     → Return: UpstreamTarget
//! ```
//!
//! # Design Decisions
//! - Upstream bases parsed at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same URL
//! - No failure path: resolution always produces a URL

pub mod media;
pub mod resolver;

pub use media::{media_type_for, DEFAULT_MEDIA_TYPE};
pub use resolver::{ResizeSpec, UpstreamKind, UpstreamResolver, UpstreamTarget};
