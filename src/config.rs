// src/config.rs

//! Manages server configuration: defaults and the option-expression parser.

use tracing::error;

fn default_host() -> String {
    // An empty host binds all interfaces.
    String::new()
}
fn default_port() -> u16 {
    6080
}
fn default_server_threads() -> usize {
    16
}
fn default_fetcher_threads() -> usize {
    16
}
fn default_ttl() -> i32 {
    3600
}

/// The server's runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The interface to bind; empty means all interfaces.
    pub host: String,
    pub port: u16,
    /// Number of counter shards for session workers; bounds nothing else
    /// under the async runtime but is reported by `stats` as `threads`.
    pub server_threads: usize,
    /// Number of concurrent fetch workers.
    pub fetcher_threads: usize,
    /// Default per-record TTL in seconds, applied when a `get` carries none.
    pub ttl: i32,
    /// Whether fetched-origin HTTP clients are pooled for reuse.
    pub keepalive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            server_threads: default_server_threads(),
            fetcher_threads: default_fetcher_threads(),
            ttl: default_ttl(),
            keepalive: true,
        }
    }
}

impl Config {
    /// Parses a `#`-separated `key=value` option expression, e.g.
    /// `host=127.0.0.1#port=6080#fetcher_threads=8`.
    ///
    /// Unknown keys are logged at ERROR and skipped; fields left unset keep
    /// their defaults. Elements without a `=` are ignored.
    pub fn from_expr(expr: &str) -> Self {
        let mut config = Config::default();

        for elem in expr.split('#') {
            let Some((key, value)) = elem.split_once('=') else {
                continue;
            };
            match key {
                "host" => config.host = value.to_string(),
                "port" => config.port = parse_number(value),
                "server_threads" => config.server_threads = parse_number(value),
                "fetcher_threads" => config.fetcher_threads = parse_number(value),
                "ttl" => config.ttl = parse_number(value),
                "keepalive" => match value {
                    "true" => config.keepalive = true,
                    "false" => config.keepalive = false,
                    _ => {
                        error!("keepalive value must be 'true' or 'false' (assuming 'true')");
                        config.keepalive = true;
                    }
                },
                _ => error!("unknown option '{key}'"),
            }
        }

        config
    }
}

// Numeric option values parse leniently: garbage coerces to zero rather
// than failing configuration.
fn parse_number<T: std::str::FromStr + Default>(value: &str) -> T {
    value.parse().unwrap_or_default()
}
