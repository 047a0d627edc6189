// src/core/fetch/client_pool.rs

//! A keep-alive HTTP client pool keyed by origin `(host, port)`.
//!
//! The pool holds at most `2 × fetcher_threads` entries. Since at most
//! `fetcher_threads` clients can be borrowed at once, a full pool always
//! contains idle entries, so the one-pass eviction in `get_client` always
//! makes progress.

use crate::core::CacheOrBustError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// Per-operation deadline for origin connections and requests.
const HTTP_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct PoolEntry {
    id: u64,
    client: reqwest::Client,
    in_use: bool,
}

#[derive(Debug, Default)]
struct PoolInner {
    buckets: HashMap<String, Vec<PoolEntry>>,
    size: usize,
    next_id: u64,
}

/// A borrowed client. Return it with [`HttpClientPool::return_client`];
/// exactly one return must follow each successful borrow.
#[derive(Debug)]
pub struct PooledClient {
    pub client: reqwest::Client,
    bucket: String,
    /// `None` for untracked clients handed out with keep-alive disabled.
    id: Option<u64>,
}

/// Thread-safe multimap of `host:port` to keep-alive client entries.
///
/// The single pool lock is held only for map manipulation, never across an
/// `.await` or any store call.
#[derive(Debug)]
pub struct HttpClientPool {
    inner: Mutex<PoolInner>,
    capacity: usize,
    use_keepalive: bool,
}

impl HttpClientPool {
    /// Creates a pool sized for `fetcher_threads` concurrent borrowers.
    pub fn new(fetcher_threads: usize, use_keepalive: bool) -> Self {
        Self {
            inner: Mutex::new(PoolInner::default()),
            capacity: fetcher_threads.max(1) * 2,
            use_keepalive,
        }
    }

    /// Borrows a client for `(host, port)`: the first idle entry in the
    /// bucket, or a freshly opened one (evicting idle entries first when the
    /// pool is at capacity). With keep-alive disabled, every call hands out
    /// a fresh client that is not tracked in the pool.
    pub fn get_client(&self, host: &str, port: u16) -> Result<PooledClient, CacheOrBustError> {
        let bucket = format!("{host}:{port}");

        if !self.use_keepalive {
            return Ok(PooledClient {
                client: build_client()?,
                bucket,
                id: None,
            });
        }

        let mut inner = self.inner.lock();

        if let Some(entries) = inner.buckets.get_mut(&bucket)
            && let Some(entry) = entries.iter_mut().find(|entry| !entry.in_use)
        {
            entry.in_use = true;
            return Ok(PooledClient {
                client: entry.client.clone(),
                bucket,
                id: Some(entry.id),
            });
        }

        if inner.size >= self.capacity {
            self.evict_idle(&mut inner);
        }

        let client = build_client()?;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.buckets.entry(bucket.clone()).or_default().push(PoolEntry {
            id,
            client: client.clone(),
            in_use: true,
        });
        inner.size += 1;

        Ok(PooledClient {
            client,
            bucket,
            id: Some(id),
        })
    }

    /// Returns a borrowed client. `keep=true` marks the entry idle for
    /// reuse; `keep=false` erases and drops it. Untracked clients (or
    /// entries already evicted) are simply dropped.
    pub fn return_client(&self, lease: PooledClient, keep: bool) {
        let Some(id) = lease.id else {
            return;
        };

        let mut inner = self.inner.lock();
        let Some(entries) = inner.buckets.get_mut(&lease.bucket) else {
            return;
        };
        let Some(pos) = entries.iter().position(|entry| entry.id == id) else {
            return;
        };

        if keep {
            entries[pos].in_use = false;
        } else {
            entries.remove(pos);
            if entries.is_empty() {
                inner.buckets.remove(&lease.bucket);
            }
            inner.size -= 1;
        }
    }

    /// Current number of entries, borrowed or idle.
    pub fn len(&self) -> usize {
        self.inner.lock().size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walks the entire pool once, erasing every idle entry. The capacity
    /// invariant guarantees idle entries exist whenever the pool is full.
    fn evict_idle(&self, inner: &mut PoolInner) {
        inner.buckets.retain(|_, entries| {
            entries.retain(|entry| entry.in_use);
            !entries.is_empty()
        });
        inner.size = inner.buckets.values().map(Vec::len).sum();

        debug_assert!(inner.size < self.capacity, "eviction must free pool capacity");
        if inner.size >= self.capacity {
            warn!(
                "client pool still at capacity after eviction ({} entries in use)",
                inner.size
            );
        }
    }
}

/// Builds a keep-alive client with the per-operation deadline applied to
/// both connect and full-request time.
fn build_client() -> Result<reqwest::Client, CacheOrBustError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(HTTP_DEADLINE)
        .timeout(HTTP_DEADLINE)
        .build()?)
}
