use cacheorbust::config::Config;
use cacheorbust::core::commands::Stats;
use cacheorbust::core::fetch::FetchQueue;
use cacheorbust::core::protocol::Response;
use cacheorbust::core::state::{OpCounters, OpKind, ServerState};
use cacheorbust::core::storage::{MemoryStore, TtlStore};
use std::sync::Arc;

fn test_state() -> Arc<ServerState> {
    let config = Config::from_expr("server_threads=4");
    let store = Arc::new(MemoryStore::new());
    let ttl_store: Arc<dyn TtlStore> = store.clone();
    let counters = Arc::new(OpCounters::new(config.server_threads));
    let fetch_queue = Arc::new(FetchQueue::new(
        ttl_store.clone(),
        counters.clone(),
        config.fetcher_threads,
        config.keepalive,
    ));
    Arc::new(ServerState::new(config, ttl_store, fetch_queue, counters))
}

fn stat_entries(response: Response) -> Vec<(&'static str, String)> {
    match response {
        Response::Stats(entries) => entries,
        other => panic!("expected stats response, got {other:?}"),
    }
}

fn stat<'a>(entries: &'a [(&'static str, String)], name: &str) -> &'a str {
    entries
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("missing stat '{name}'"))
}

#[tokio::test]
async fn test_stats_names_and_order() {
    let state = test_state();
    let entries = stat_entries(Stats.execute(&state).await.unwrap());
    let names: Vec<&str> = entries.iter().map(|(n, _)| *n).collect();
    assert_eq!(
        names,
        [
            "pid",
            "uptime",
            "time",
            "version",
            "pointer_size",
            "curr_connections",
            "threads",
            "curr_items",
            "bytes",
            "flush",
            "hit",
            "miss",
            "hit_rate",
            "enqueue",
            "queue_size",
            "fetch",
            "fetch_failed",
        ]
    );
}

#[tokio::test]
async fn test_hit_rate_is_zero_without_traffic() {
    let state = test_state();
    let entries = stat_entries(Stats.execute(&state).await.unwrap());
    assert_eq!(stat(&entries, "hit"), "0");
    assert_eq!(stat(&entries, "miss"), "0");
    assert_eq!(stat(&entries, "hit_rate"), "0.0");
}

#[tokio::test]
async fn test_hit_rate_after_mixed_traffic() {
    let state = test_state();
    for _ in 0..3 {
        state.counters.incr(0, OpKind::Hit);
    }
    for _ in 0..2 {
        state.counters.incr(1, OpKind::Miss);
    }

    let entries = stat_entries(Stats.execute(&state).await.unwrap());
    assert_eq!(stat(&entries, "hit"), "3");
    assert_eq!(stat(&entries, "miss"), "2");
    assert_eq!(stat(&entries, "hit_rate"), "0.600000");
}

#[tokio::test]
async fn test_fetch_counters_come_from_the_global_row() {
    let state = test_state();
    state.counters.incr_global(OpKind::Fetch);
    state.counters.incr_global(OpKind::FetchFail);
    state.counters.incr_global(OpKind::FetchFail);

    let entries = stat_entries(Stats.execute(&state).await.unwrap());
    assert_eq!(stat(&entries, "fetch"), "1");
    assert_eq!(stat(&entries, "fetch_failed"), "2");
}

#[tokio::test]
async fn test_gauges_reflect_state() {
    let state = test_state();
    state.connection_opened();
    state.connection_opened();

    let entries = stat_entries(Stats.execute(&state).await.unwrap());
    assert_eq!(stat(&entries, "curr_connections"), "2");
    assert_eq!(stat(&entries, "threads"), "4");
    assert_eq!(stat(&entries, "queue_size"), "0");
    assert_eq!(stat(&entries, "version"), concat!("cacheorbust/", env!("CARGO_PKG_VERSION")));
    assert_eq!(stat(&entries, "pointer_size"), usize::BITS.to_string());
}
