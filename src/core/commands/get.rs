// src/core/commands/get.rs

//! Implements the `get` command: read-through lookup with best-effort
//! single-flight on misses.

use crate::core::CacheOrBustError;
use crate::core::fetch::FetchTask;
use crate::core::protocol::Response;
use crate::core::state::{OpKind, ServerState};
use crate::core::storage::record::{Record, SENTINEL_TTL_SECS};
use bytes::Bytes;
use std::sync::Arc;

/// The `get key url [ttl]` command.
///
/// A READY record is returned immediately. A PENDING record answers like a
/// miss without enqueueing another fetch. An absent key answers like a
/// miss, writes the pending sentinel, and enqueues a background fetch of
/// `url`; the sentinel's short TTL bounds how long duplicate misses stay
/// deduplicated.
#[derive(Debug, Clone)]
pub struct Get {
    pub key: String,
    pub url: String,
    /// TTL for the filled record; `None` applies the configured default.
    pub ttl: Option<i32>,
}

impl Get {
    pub async fn execute(
        &self,
        state: &Arc<ServerState>,
        slot: usize,
    ) -> Result<Response, CacheOrBustError> {
        let record = state.store.get(self.key.as_bytes()).await.map(Record::decode);

        match record {
            Some(Record::Ready(body)) => {
                state.counters.incr(slot, OpKind::Hit);
                Ok(Response::Value {
                    key: self.key.clone(),
                    body,
                })
            }
            Some(Record::Pending) => {
                state.counters.incr(slot, OpKind::Miss);
                Ok(Response::End)
            }
            None => {
                state.counters.incr(slot, OpKind::Miss);
                self.fill_miss(state, slot).await
            }
        }
    }

    /// Writes the sentinel and enqueues the background fetch. A sentinel
    /// write failure is reported to the client and suppresses the enqueue.
    async fn fill_miss(
        &self,
        state: &Arc<ServerState>,
        slot: usize,
    ) -> Result<Response, CacheOrBustError> {
        if state
            .store
            .set(self.key.as_bytes(), Record::sentinel(), SENTINEL_TTL_SECS)
            .await
            .is_err()
        {
            return Ok(Response::ServerError("could not set sentinel".to_string()));
        }

        state.fetch_queue.add_task(FetchTask {
            key: Bytes::copy_from_slice(self.key.as_bytes()),
            url: self.url.clone(),
            ttl: self.ttl.unwrap_or(state.config.ttl),
        });
        state.counters.incr(slot, OpKind::Enqueue);

        Ok(Response::End)
    }
}
