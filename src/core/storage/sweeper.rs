// src/core/storage/sweeper.rs

//! Implements the active expiration sweeper for the in-memory store.

use crate::core::storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// The interval at which the sweeper checks for expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// `ExpirationSweeper` is a background task that actively expires entries to
/// prevent memory build-up from expired data that is never read again.
pub struct ExpirationSweeper {
    store: Arc<MemoryStore>,
}

impl ExpirationSweeper {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Runs the main loop for the expiration sweeper.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Expiration sweeper started. Check interval: {:?}", SWEEP_INTERVAL);
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let purged = self.store.purge_expired();
                    if purged > 0 {
                        debug!("Purged {} expired entries.", purged);
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Expiration sweeper shutting down.");
                    return;
                }
            }
        }
    }
}
