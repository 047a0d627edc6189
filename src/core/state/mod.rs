// src/core/state/mod.rs

//! The shared, thread-safe state for the whole server.

pub mod counters;

pub use counters::{OpCounters, OpKind};

use crate::config::Config;
use crate::core::fetch::FetchQueue;
use crate::core::storage::TtlStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Holds all state shared between sessions, fetch workers, and background
/// tasks. Constructed once at startup and passed around as `Arc<ServerState>`.
#[derive(Debug)]
pub struct ServerState {
    /// The runtime configuration, immutable after startup.
    pub config: Config,
    /// The backing TTL store. Borrowed from the host; the engine never
    /// constructs or tears it down.
    pub store: Arc<dyn TtlStore>,
    /// The background fetch pipeline.
    pub fetch_queue: Arc<FetchQueue>,
    /// The per-operation statistics counters.
    pub counters: Arc<OpCounters>,
    /// When the service started; backs the `uptime` statistic.
    pub start_time: Instant,
    /// Gauge of currently open client sessions.
    curr_connections: AtomicU64,
}

impl ServerState {
    pub fn new(
        config: Config,
        store: Arc<dyn TtlStore>,
        fetch_queue: Arc<FetchQueue>,
        counters: Arc<OpCounters>,
    ) -> Self {
        Self {
            config,
            store,
            fetch_queue,
            counters,
            start_time: Instant::now(),
            curr_connections: AtomicU64::new(0),
        }
    }

    pub fn connection_opened(&self) {
        self.curr_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.curr_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn current_connections(&self) -> u64 {
        self.curr_connections.load(Ordering::Relaxed)
    }
}
