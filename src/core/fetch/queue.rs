// src/core/fetch/queue.rs

//! The bounded fetch worker pool and its FIFO task queue.

use crate::core::CacheOrBustError;
use crate::core::fetch::{HttpClientPool, PooledClient};
use crate::core::state::{OpCounters, OpKind};
use crate::core::storage::{TtlStore, record::Record};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use url::Url;

/// One enqueued origin fetch. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTask {
    pub key: Bytes,
    pub url: String,
    /// TTL in seconds for the filled record; semantics delegated to the store.
    pub ttl: i32,
}

/// The FIFO queue feeding the fetch workers, plus the client pool they
/// borrow from.
///
/// The queue itself is unbounded; concurrency is bounded by the number of
/// worker tasks consuming it.
#[derive(Debug)]
pub struct FetchQueue {
    tx: mpsc::UnboundedSender<FetchTask>,
    rx: Mutex<mpsc::UnboundedReceiver<FetchTask>>,
    depth: AtomicUsize,
    workers: usize,
    store: Arc<dyn TtlStore>,
    counters: Arc<OpCounters>,
    clients: HttpClientPool,
}

impl FetchQueue {
    pub fn new(
        store: Arc<dyn TtlStore>,
        counters: Arc<OpCounters>,
        fetcher_threads: usize,
        use_keepalive: bool,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            depth: AtomicUsize::new(0),
            workers: fetcher_threads.max(1),
            store,
            counters,
            clients: HttpClientPool::new(fetcher_threads, use_keepalive),
        }
    }

    /// Enqueues a fetch. Tasks for distinct keys may execute in parallel;
    /// no ordering between tasks is promised.
    pub fn add_task(&self, task: FetchTask) {
        self.depth.fetch_add(1, Ordering::Relaxed);
        if self.tx.send(task).is_err() {
            // Workers are gone; this only happens during shutdown.
            self.depth.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Current queue depth, for `stats`.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Spawns the worker tasks into `tasks`. Workers drain the queue until
    /// the shutdown signal fires; an in-flight fetch runs to its deadline.
    pub fn start(
        self: Arc<Self>,
        shutdown_tx: &broadcast::Sender<()>,
        tasks: &mut JoinSet<anyhow::Result<()>>,
    ) {
        info!("Starting {} fetch workers.", self.workers);
        for _ in 0..self.workers {
            let queue = self.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            tasks.spawn(async move {
                queue.worker_loop(shutdown_rx).await;
                Ok(())
            });
        }
    }

    async fn worker_loop(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        loop {
            let task = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => return,
                task = async { self.rx.lock().await.recv().await } => {
                    match task {
                        Some(task) => task,
                        None => return,
                    }
                }
            };
            self.depth.fetch_sub(1, Ordering::Relaxed);
            self.run_task(task).await;
        }
    }

    /// Executes one fetch: validate the URL, borrow a client, GET the body,
    /// and fill (or evict) the record.
    async fn run_task(&self, task: FetchTask) {
        let Some((host, port)) = parse_origin(&task.url) else {
            info!("illegal URL '{}'", task.url);
            self.store.remove(&task.key).await;
            self.counters.incr_global(OpKind::FetchFail);
            return;
        };

        debug!("fetching '{}'", task.url);

        let client = match self.clients.get_client(&host, port) {
            Ok(client) => client,
            Err(e) => {
                error!("failed to open client for '{}': {}", task.url, e);
                self.store.remove(&task.key).await;
                self.counters.incr_global(OpKind::FetchFail);
                return;
            }
        };

        match fetch_body(&client, &task.url).await {
            Ok(body) => {
                self.clients.return_client(client, true);
                let record = Record::ready(&body);
                if self.store.set(&task.key, record, task.ttl).await.is_err() {
                    self.store.remove(&task.key).await;
                }
                self.counters.incr_global(OpKind::Fetch);
            }
            Err(e) => {
                error!("failed to fetch URL '{}': {}", task.url, e);
                self.store.remove(&task.key).await;
                self.clients.return_client(client, false);
                self.counters.incr_global(OpKind::FetchFail);
            }
        }
    }
}

/// Extracts `(host, port)` from a fetch URL. Anything without both is
/// rejected before a client is borrowed.
fn parse_origin(raw: &str) -> Option<(String, u16)> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port_or_known_default()?;
    if host.is_empty() || port == 0 {
        return None;
    }
    Some((host, port))
}

/// Issues the GET and reads the whole body into memory. Statuses other than
/// 200 and 204 are failures; 204 yields an empty body.
async fn fetch_body(client: &PooledClient, url: &str) -> Result<Bytes, CacheOrBustError> {
    let response = client.client.get(url).send().await?;
    let status = response.status();
    if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::NO_CONTENT {
        return Err(CacheOrBustError::HttpClientError(format!(
            "unexpected status {status}"
        )));
    }
    Ok(response.bytes().await?)
}
