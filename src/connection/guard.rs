// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource management.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// An RAII guard to ensure the connection gauge is always released when a
/// connection handler's scope is exited, on any path.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    addr: SocketAddr,
}

impl ConnectionGuard {
    pub(crate) fn new(state: Arc<ServerState>, addr: SocketAddr) -> Self {
        state.connection_opened();
        Self { state, addr }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!("ConnectionGuard dropping, cleaning up connection {}", self.addr);
        self.state.connection_closed();
    }
}
