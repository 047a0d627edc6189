// src/core/fetch/mod.rs

//! The background fetch pipeline: the bounded worker pool that executes
//! origin fetches and the keep-alive HTTP client pool it borrows from.

pub mod client_pool;
pub mod queue;

pub use client_pool::{HttpClientPool, PooledClient};
pub use queue::{FetchQueue, FetchTask};
