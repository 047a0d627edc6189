// src/core/storage/store.rs

//! The interface the cache engine consumes from its backing TTL store.

use crate::core::CacheOrBustError;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

/// A byte-string key/value store with per-entry time-to-live, linearizable
/// per key. The engine borrows the store; it never constructs one itself.
#[async_trait]
pub trait TtlStore: Send + Sync + Debug {
    /// Stores `value` under `key` for `ttl` seconds. A TTL of zero or less
    /// stores without expiration.
    async fn set(&self, key: &[u8], value: Bytes, ttl: i32) -> Result<(), CacheOrBustError>;

    /// Returns the live value for `key`, if any.
    async fn get(&self, key: &[u8]) -> Option<Bytes>;

    /// Removes `key`; returns whether a live entry was present.
    async fn remove(&self, key: &[u8]) -> bool;

    /// Removes every entry.
    async fn clear(&self);

    /// Number of live entries.
    async fn count(&self) -> u64;

    /// Total bytes held (keys plus values) by live entries.
    async fn size(&self) -> u64;
}
