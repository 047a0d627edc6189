// src/core/commands/flush.rs

//! Implements the `flush_all` command.

use crate::core::CacheOrBustError;
use crate::core::protocol::Response;
use crate::core::state::{OpKind, ServerState};
use std::sync::Arc;

/// The `flush_all` command: clears the entire store unconditionally.
#[derive(Debug, Clone, Default)]
pub struct FlushAll;

impl FlushAll {
    pub async fn execute(
        &self,
        state: &Arc<ServerState>,
        slot: usize,
    ) -> Result<Response, CacheOrBustError> {
        state.counters.incr(slot, OpKind::Flush);
        state.store.clear().await;
        Ok(Response::Ok)
    }
}
