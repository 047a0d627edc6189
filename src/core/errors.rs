// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum CacheOrBustError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("line exceeds the maximum request length")]
    LineTooLong,

    #[error("{0}")]
    ClientError(&'static str),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for CacheOrBustError {
    fn clone(&self) -> Self {
        match self {
            CacheOrBustError::Io(e) => CacheOrBustError::Io(Arc::clone(e)),
            CacheOrBustError::LineTooLong => CacheOrBustError::LineTooLong,
            CacheOrBustError::ClientError(s) => CacheOrBustError::ClientError(s),
            CacheOrBustError::UnknownCommand(s) => CacheOrBustError::UnknownCommand(s.clone()),
            CacheOrBustError::HttpClientError(s) => CacheOrBustError::HttpClientError(s.clone()),
            CacheOrBustError::StoreError(s) => CacheOrBustError::StoreError(s.clone()),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for CacheOrBustError {
    fn from(e: std::io::Error) -> Self {
        CacheOrBustError::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for CacheOrBustError {
    fn from(e: reqwest::Error) -> Self {
        CacheOrBustError::HttpClientError(e.to_string())
    }
}
