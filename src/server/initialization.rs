// src/server/initialization.rs

//! Handles the complete server initialization process, from host resolution
//! to state setup and listener binding.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::fetch::FetchQueue;
use crate::core::state::{OpCounters, ServerState};
use crate::core::storage::{MemoryStore, TtlStore};
use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::info;

/// Initializes all server components before starting the main loop.
///
/// A non-empty configured host that does not resolve fails startup here.
pub async fn setup(config: Config, store: Arc<MemoryStore>) -> Result<ServerContext> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let addr = resolve_bind_addr(&config).await?;
    let listener = TcpListener::bind(addr).await?;
    info!("cacheorbust listening on {}", listener.local_addr()?);

    let ttl_store: Arc<dyn TtlStore> = store.clone();
    let counters = Arc::new(OpCounters::new(config.server_threads));
    let fetch_queue = Arc::new(FetchQueue::new(
        ttl_store.clone(),
        counters.clone(),
        config.fetcher_threads,
        config.keepalive,
    ));
    let state = Arc::new(ServerState::new(config, ttl_store, fetch_queue, counters));
    info!("Server state initialized.");

    Ok(ServerContext {
        state,
        store,
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
    })
}

/// Resolves the configured bind address. An empty host binds all interfaces.
async fn resolve_bind_addr(config: &Config) -> Result<SocketAddr> {
    if config.host.is_empty() {
        return Ok(SocketAddr::from(([0, 0, 0, 0], config.port)));
    }

    tokio::net::lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(|e| anyhow!("unknown host: {}: {}", config.host, e))?
        .next()
        .ok_or_else(|| anyhow!("unknown host: {}", config.host))
}
