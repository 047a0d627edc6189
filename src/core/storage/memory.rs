// src/core/storage/memory.rs

//! The bundled in-memory TTL store.

use crate::core::CacheOrBustError;
use crate::core::storage::TtlStore;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct StoredEntry {
    data: Bytes,
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// A sharded in-memory TTL store. Expired entries are dropped lazily on
/// read and reaped by the background sweeper.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<Bytes, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired entry; returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl TtlStore for MemoryStore {
    async fn set(&self, key: &[u8], value: Bytes, ttl: i32) -> Result<(), CacheOrBustError> {
        let expires_at =
            (ttl > 0).then(|| Instant::now() + Duration::from_secs(u64::from(ttl.unsigned_abs())));
        self.entries.insert(
            Bytes::copy_from_slice(key),
            StoredEntry {
                data: value,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> Option<Bytes> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.data.clone());
            }
        }
        // The shard reference must be released before removal.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    async fn remove(&self, key: &[u8]) -> bool {
        match self.entries.remove(key) {
            Some((_, entry)) => !entry.is_expired(Instant::now()),
            None => false,
        }
    }

    async fn clear(&self) {
        self.entries.clear();
    }

    async fn count(&self) -> u64 {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count() as u64
    }

    async fn size(&self) -> u64 {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| (entry.key().len() + entry.value().data.len()) as u64)
            .sum()
    }
}
