// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a
//! client connection.

use super::guard::ConnectionGuard;
use crate::core::commands::{FlushAll, Get, Stats};
use crate::core::protocol::{Request, Response, TextCodec};
use crate::core::state::ServerState;
use crate::core::CacheOrBustError;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, error, warn};

/// A session is closed after this long without a complete request line.
const SESSION_TIMEOUT: Duration = Duration::from_secs(30);

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection: one request line at a
/// time, dispatched to a command, with the response written back before the
/// next line is read.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, TextCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    global_shutdown_rx: broadcast::Receiver<()>,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        global_shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, TextCodec),
            addr,
            state,
            session_id,
            global_shutdown_rx,
        }
    }

    /// The main event loop for the connection, handling incoming lines and
    /// shutdown/timeout signals.
    pub async fn run(&mut self) -> Result<(), CacheOrBustError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.addr);

        loop {
            tokio::select! {
                biased;
                _ = self.global_shutdown_rx.recv() => {
                    debug!("Connection handler for {} received shutdown signal.", self.addr);
                    return Ok(());
                }
                result = tokio::time::timeout(SESSION_TIMEOUT, self.framed.next()) => {
                    match result {
                        Err(_) => {
                            debug!("Session for {} timed out after {:?}.", self.addr, SESSION_TIMEOUT);
                            return Ok(());
                        }
                        Ok(None) => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            return Ok(());
                        }
                        Ok(Some(Ok(line))) => {
                            if let NextAction::ExitLoop = self.process_line(&line).await? {
                                return Ok(());
                            }
                        }
                        Ok(Some(Err(CacheOrBustError::LineTooLong))) => {
                            warn!("Oversized request line from {}; terminating session.", self.addr);
                            return Ok(());
                        }
                        Ok(Some(Err(e))) => {
                            debug!("Connection error for {}: {}", self.addr, e);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Parses one request line, dispatches it, and writes the response.
    /// Validation failures answer the client but keep the session open.
    async fn process_line(&mut self, line: &str) -> Result<NextAction, CacheOrBustError> {
        let slot = self.session_id as usize;

        let response = match Request::parse(line) {
            Ok(Request::Get { key, url, ttl }) => {
                Get { key, url, ttl }.execute(&self.state, slot).await?
            }
            Ok(Request::Stats) => Stats.execute(&self.state).await?,
            Ok(Request::FlushAll) => FlushAll.execute(&self.state, slot).await?,
            Ok(Request::Quit) => return Ok(NextAction::ExitLoop),
            Err(CacheOrBustError::ClientError(msg)) => Response::ClientError(msg),
            Err(CacheOrBustError::UnknownCommand(cmd)) => {
                error!("({}): invalid command '{}'", self.addr, cmd);
                Response::Error
            }
            Err(e) => Response::ServerError(e.to_string()),
        };

        self.framed.send(response).await?;
        Ok(NextAction::Continue)
    }
}
