//! Shutdown coordination for background tasks.
//!
//! The attempt tracker itself needs no teardown; dropping the last handle
//! frees its store. Only tasks holding a tracker clone (the sweeper) must be
//! told to stop so that drop can happen.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to every background task.
pub struct Shutdown {
    /// Sender side; each task holds its own receiver.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a task that must stop on shutdown.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Safe to call with no subscribers left.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no background tasks running");
        }
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
