// src/server/spawner.rs

//! Spawns all of the server's long-running background tasks.

use super::context::ServerContext;
use crate::core::storage::sweeper::ExpirationSweeper;

/// Spawns the fetch workers and the store's expiration sweeper into the
/// context's background task set.
pub fn spawn_all(ctx: &mut ServerContext) {
    ctx.state
        .fetch_queue
        .clone()
        .start(&ctx.shutdown_tx, &mut ctx.background_tasks);

    let sweeper = ExpirationSweeper::new(ctx.store.clone());
    let shutdown_rx = ctx.shutdown_tx.subscribe();
    ctx.background_tasks.spawn(async move {
        sweeper.run(shutdown_rx).await;
        Ok(())
    });
}
