// src/server/mod.rs

use crate::config::Config;
use crate::core::storage::MemoryStore;
use anyhow::Result;
use std::sync::Arc;

pub mod connection_loop;
pub mod context;
pub mod initialization;
pub mod spawner;

pub use context::ServerContext;

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config, store: Arc<MemoryStore>) -> Result<()> {
    // 1. Bind the listener and initialize server state.
    let mut server_context = initialization::setup(config, store).await?;

    // 2. Spawn all background tasks (fetch workers, expiration sweeper).
    spawner::spawn_all(&mut server_context);

    // 3. Start the main connection acceptance loop. This runs until shutdown.
    connection_loop::run(server_context).await;

    Ok(())
}
