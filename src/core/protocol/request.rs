// src/core/protocol/request.rs

//! Parses a tokenized request line into a `Request`.

use crate::core::CacheOrBustError;

/// A single parsed request from a client session.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// `get <key> <url> [<ttl>]`: read-through lookup.
    Get {
        key: String,
        url: String,
        /// `None` means the caller did not supply a usable TTL and the
        /// configured default applies.
        ttl: Option<i32>,
    },
    /// `stats`: emit counters and gauges.
    Stats,
    /// `flush_all`: clear the entire store.
    FlushAll,
    /// `quit`: close the session.
    Quit,
}

impl Request {
    /// Parses one request line. Tokens are separated by ASCII whitespace.
    ///
    /// Validation failures surface as `ClientError` (the session stays open);
    /// an unrecognized command surfaces as `UnknownCommand`.
    pub fn parse(line: &str) -> Result<Self, CacheOrBustError> {
        let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
        let cmd = tokens.first().copied().unwrap_or("");

        match cmd {
            "get" => Self::parse_get(&tokens),
            "stats" => Ok(Request::Stats),
            "flush_all" => Ok(Request::FlushAll),
            "quit" => Ok(Request::Quit),
            other => Err(CacheOrBustError::UnknownCommand(other.to_string())),
        }
    }

    fn parse_get(tokens: &[&str]) -> Result<Self, CacheOrBustError> {
        if tokens.len() < 2 {
            return Err(CacheOrBustError::ClientError("missing key"));
        }
        if tokens.len() < 3 {
            return Err(CacheOrBustError::ClientError("missing URL"));
        }
        if tokens.len() > 4 {
            return Err(CacheOrBustError::ClientError("extra data after TTL"));
        }

        // A malformed TTL is accepted and coerced to the configured default
        // rather than rejected.
        let ttl = tokens.get(3).and_then(|t| t.parse::<i32>().ok());

        Ok(Request::Get {
            key: tokens[1].to_string(),
            url: tokens[2].to_string(),
            ttl,
        })
    }
}
