// src/core/protocol/codec.rs

//! Implements the line-oriented text framing used on the cache port and the
//! corresponding `Encoder`/`Decoder` for network communication.

use crate::core::CacheOrBustError;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The CRLF (Carriage Return, Line Feed) sequence terminating every line.
const CRLF: &[u8] = b"\r\n";

/// Maximum accepted request line length. Lines longer than this terminate the
/// session rather than being processed.
pub const MAX_LINE_LENGTH: usize = 16 * 1024;

/// A single response on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A cache hit: `VALUE <key> 0 <bytes>\r\n<body>\r\nEND\r\n`.
    Value { key: String, body: Bytes },
    /// A miss (or pending fill): `END\r\n`.
    End,
    /// `OK\r\n`.
    Ok,
    /// Unknown command: `ERROR\r\n`.
    Error,
    /// A request validation failure; the session stays open.
    ClientError(&'static str),
    /// A resource failure on the server side; the session stays open.
    ServerError(String),
    /// `STAT <name> <value>\r\n` per entry, then `END\r\n`.
    Stats(Vec<(&'static str, String)>),
}

/// A `tokio_util::codec` implementation framing requests as text lines and
/// encoding `Response`s.
#[derive(Debug, Default)]
pub struct TextCodec;

impl Decoder for TextCodec {
    type Item = String;
    type Error = CacheOrBustError;

    /// Yields one request line at a time, without its line terminator. Both
    /// `\r\n` and bare `\n` terminators are accepted.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        let Some(newline) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > MAX_LINE_LENGTH {
                return Err(CacheOrBustError::LineTooLong);
            }
            return Ok(None);
        };

        if newline > MAX_LINE_LENGTH {
            return Err(CacheOrBustError::LineTooLong);
        }

        let mut line = src.split_to(newline + 1);
        line.truncate(newline);
        if line.last() == Some(&b'\r') {
            line.truncate(newline - 1);
        }

        // Command lines are ASCII; anything else is handed to the dispatcher
        // as-is and rejected there as an unknown command.
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl Encoder<Response> for TextCodec {
    type Error = CacheOrBustError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Response::Value { key, body } => {
                dst.extend_from_slice(b"VALUE ");
                dst.extend_from_slice(key.as_bytes());
                dst.extend_from_slice(b" 0 ");
                dst.extend_from_slice(body.len().to_string().as_bytes());
                dst.extend_from_slice(CRLF);
                dst.extend_from_slice(&body);
                dst.extend_from_slice(CRLF);
                dst.extend_from_slice(b"END");
                dst.extend_from_slice(CRLF);
            }
            Response::End => {
                dst.extend_from_slice(b"END");
                dst.extend_from_slice(CRLF);
            }
            Response::Ok => {
                dst.extend_from_slice(b"OK");
                dst.extend_from_slice(CRLF);
            }
            Response::Error => {
                dst.extend_from_slice(b"ERROR");
                dst.extend_from_slice(CRLF);
            }
            Response::ClientError(msg) => {
                dst.extend_from_slice(b"CLIENT_ERROR ");
                dst.extend_from_slice(msg.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            Response::ServerError(msg) => {
                dst.extend_from_slice(b"SERVER_ERROR ");
                dst.extend_from_slice(msg.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            Response::Stats(stats) => {
                for (name, value) in stats {
                    dst.extend_from_slice(b"STAT ");
                    dst.extend_from_slice(name.as_bytes());
                    dst.extend_from_slice(b" ");
                    dst.extend_from_slice(value.as_bytes());
                    dst.extend_from_slice(CRLF);
                }
                dst.extend_from_slice(b"END");
                dst.extend_from_slice(CRLF);
            }
        }
        Ok(())
    }
}

impl Response {
    /// A convenience method to encode a response into a `Vec<u8>`.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, CacheOrBustError> {
        let mut buf = BytesMut::new();
        TextCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.to_vec())
    }
}
