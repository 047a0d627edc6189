use bytes::Bytes;
use cacheorbust::config::Config;
use cacheorbust::core::commands::Get;
use cacheorbust::core::fetch::FetchQueue;
use cacheorbust::core::protocol::Response;
use cacheorbust::core::state::{OpCounters, OpKind, ServerState};
use cacheorbust::core::storage::record::Record;
use cacheorbust::core::storage::{MemoryStore, TtlStore};
use std::sync::Arc;

/// Builds a server state whose fetch workers are not running, so enqueued
/// tasks stay observable through the queue depth.
fn test_state() -> (Arc<ServerState>, Arc<MemoryStore>) {
    let config = Config::from_expr("server_threads=2#fetcher_threads=2");
    let store = Arc::new(MemoryStore::new());
    let ttl_store: Arc<dyn TtlStore> = store.clone();
    let counters = Arc::new(OpCounters::new(config.server_threads));
    let fetch_queue = Arc::new(FetchQueue::new(
        ttl_store.clone(),
        counters.clone(),
        config.fetcher_threads,
        config.keepalive,
    ));
    let state = Arc::new(ServerState::new(config, ttl_store, fetch_queue, counters));
    (state, store)
}

fn get(key: &str, ttl: Option<i32>) -> Get {
    Get {
        key: key.to_string(),
        url: "http://origin.example.com/page".to_string(),
        ttl,
    }
}

#[tokio::test]
async fn test_absent_key_misses_and_enqueues() {
    let (state, store) = test_state();

    let response = get("k", Some(60)).execute(&state, 0).await.unwrap();
    assert_eq!(response, Response::End);

    // The sentinel is in place and exactly one fetch is queued.
    let raw = store.get(b"k").await.expect("sentinel should be written");
    assert_eq!(Record::decode(raw), Record::Pending);
    assert_eq!(state.fetch_queue.depth(), 1);
    assert_eq!(state.counters.sum(OpKind::Miss), 1);
    assert_eq!(state.counters.sum(OpKind::Enqueue), 1);
    assert_eq!(state.counters.sum(OpKind::Hit), 0);
}

#[tokio::test]
async fn test_pending_key_misses_without_enqueue() {
    let (state, _store) = test_state();

    get("k", Some(60)).execute(&state, 0).await.unwrap();
    let response = get("k", Some(60)).execute(&state, 1).await.unwrap();
    assert_eq!(response, Response::End);

    // The second miss is deduplicated by the sentinel.
    assert_eq!(state.fetch_queue.depth(), 1);
    assert_eq!(state.counters.sum(OpKind::Miss), 2);
    assert_eq!(state.counters.sum(OpKind::Enqueue), 1);
}

#[tokio::test]
async fn test_ready_key_hits() {
    let (state, store) = test_state();
    store
        .set(b"k", Record::ready(b"hello"), 0)
        .await
        .unwrap();

    let response = get("k", None).execute(&state, 0).await.unwrap();
    assert_eq!(
        response,
        Response::Value {
            key: "k".to_string(),
            body: Bytes::from_static(b"hello"),
        }
    );
    assert_eq!(state.counters.sum(OpKind::Hit), 1);
    assert_eq!(state.counters.sum(OpKind::Miss), 0);
    assert_eq!(state.fetch_queue.depth(), 0);
}

#[tokio::test]
async fn test_ready_key_with_empty_body_hits() {
    let (state, store) = test_state();
    store.set(b"k", Record::ready(b""), 0).await.unwrap();

    let response = get("k", None).execute(&state, 0).await.unwrap();
    assert_eq!(
        response,
        Response::Value {
            key: "k".to_string(),
            body: Bytes::new(),
        }
    );
}

#[tokio::test]
async fn test_hits_and_misses_account_for_every_get() {
    let (state, store) = test_state();
    store.set(b"hot", Record::ready(b"data"), 0).await.unwrap();

    for _ in 0..3 {
        get("hot", None).execute(&state, 0).await.unwrap();
    }
    for _ in 0..2 {
        get("cold", None).execute(&state, 1).await.unwrap();
    }

    let hits = state.counters.sum(OpKind::Hit);
    let misses = state.counters.sum(OpKind::Miss);
    assert_eq!(hits, 3);
    assert_eq!(misses, 2);
    assert_eq!(hits + misses, 5);
}
