// src/server/context.rs

use crate::core::state::ServerState;
use crate::core::storage::MemoryStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub state: Arc<ServerState>,
    /// The concrete bundled store, kept alongside the trait handle in
    /// `state` so the expiration sweeper can be spawned against it.
    pub store: Arc<MemoryStore>,
    pub listener: TcpListener,
    pub shutdown_tx: broadcast::Sender<()>,
    pub background_tasks: JoinSet<anyhow::Result<()>>,
}
