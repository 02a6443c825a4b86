//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// One-shot fan-out of the "stop accepting traffic" event.
///
/// The signal task owns the coordinator; the HTTP server holds a receiver
/// and starts draining when it fires or when the coordinator is dropped.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown event.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown event, returning how many receivers were notified.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(notified, "Shutdown triggered");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
