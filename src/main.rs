// src/main.rs

//! The main entry point for the cacheorbust server application.

use anyhow::Result;
use cacheorbust::config::Config;
use cacheorbust::core::storage::MemoryStore;
use cacheorbust::server;
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("cacheorbust version {VERSION}");
        return Ok(());
    }

    // Setup logging before configuration parsing so that bad options are
    // reported. The filter comes from RUST_LOG when set; messages outside
    // the filter are suppressed.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    info!("cacheorbust starting up...");

    // The configuration is a single `#`-separated option expression, e.g.
    // `--options "host=127.0.0.1#port=6080#fetcher_threads=8"`. With no
    // options, every field keeps its default.
    let config = args
        .iter()
        .position(|arg| arg == "--options")
        .and_then(|i| args.get(i + 1))
        .map(|expr| Config::from_expr(expr))
        .unwrap_or_default();

    // The store is created by the host and borrowed by the server.
    let store = Arc::new(MemoryStore::new());

    if let Err(e) = server::run(config, store).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }

    Ok(())
}
