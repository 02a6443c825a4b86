//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline produces:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span for the request
//! - Metrics are cheap (atomic increments); the exporter is opt-in

pub mod logging;
pub mod metrics;
