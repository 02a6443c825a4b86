//! Outbound HTTP to the asset store and resizer.

pub mod client;

pub use client::{UpstreamClient, UpstreamError};
