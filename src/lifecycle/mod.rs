//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging/metrics → Bind → Serve
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM/SIGQUIT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → server stops accepting → drain in-flight (bounded) → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before binding
//! - Signal handlers are installed before the listener is bound
//! - Shutdown has timeout: forced exit after the grace period

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::ShutdownSignals;
