// src/core/protocol/mod.rs

//! The memcached-family text protocol spoken on the cache port: a line-oriented
//! request tokenizer and the response encoder.

mod codec;
mod request;

pub use codec::{MAX_LINE_LENGTH, Response, TextCodec};
pub use request::Request;
