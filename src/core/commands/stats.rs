// src/core/commands/stats.rs

//! Implements the `stats` command.

use crate::core::CacheOrBustError;
use crate::core::protocol::Response;
use crate::core::state::{OpKind, ServerState};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The `stats` command: one `STAT name value` line per metric. Counter
/// reads sum every shard without snapshot isolation.
#[derive(Debug, Clone, Default)]
pub struct Stats;

impl Stats {
    pub async fn execute(&self, state: &Arc<ServerState>) -> Result<Response, CacheOrBustError> {
        let counters = &state.counters;
        let hits = counters.sum(OpKind::Hit);
        let misses = counters.sum(OpKind::Miss);
        let hit_rate = if hits + misses > 0 {
            format!("{:.6}", hits as f64 / (hits + misses) as f64)
        } else {
            "0.0".to_string()
        };

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let stats = vec![
            ("pid", std::process::id().to_string()),
            ("uptime", state.start_time.elapsed().as_secs().to_string()),
            ("time", now.to_string()),
            (
                "version",
                format!("cacheorbust/{}", env!("CARGO_PKG_VERSION")),
            ),
            ("pointer_size", usize::BITS.to_string()),
            ("curr_connections", state.current_connections().to_string()),
            ("threads", state.config.server_threads.to_string()),
            ("curr_items", state.store.count().await.to_string()),
            ("bytes", state.store.size().await.to_string()),
            ("flush", counters.sum(OpKind::Flush).to_string()),
            ("hit", hits.to_string()),
            ("miss", misses.to_string()),
            ("hit_rate", hit_rate),
            ("enqueue", counters.sum(OpKind::Enqueue).to_string()),
            ("queue_size", state.fetch_queue.depth().to_string()),
            ("fetch", counters.sum(OpKind::Fetch).to_string()),
            ("fetch_failed", counters.sum(OpKind::FetchFail).to_string()),
        ];

        Ok(Response::Stats(stats))
    }
}
