//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT, SIGTERM and SIGQUIT
//! - Report which signal arrived so it can be logged
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are registered up front so a failure is a startup error

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Termination signals the process reacts to.
#[cfg(unix)]
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
    quit: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Register the signal handlers.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Wait for the next termination signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.quit.recv() => "SIGQUIT",
        }
    }
}

/// Termination signals the process reacts to.
#[cfg(not(unix))]
pub struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    /// Register the signal handlers.
    pub fn install() -> io::Result<Self> {
        Ok(Self)
    }

    /// Wait for Ctrl+C and return its name.
    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        "ctrl-c"
    }
}
