// src/core/storage/record.rs

//! The stored record layout: one flags byte followed by the payload.
//!
//! Clients never observe the flags byte; it exists so a pending fill can be
//! told apart from a completed one without a second lookup structure.

use bytes::{BufMut, Bytes, BytesMut};

/// Flags bit marking a record as a fill-in-flight sentinel.
pub const FLAG_PENDING: u8 = 1 << 0;

/// How long a sentinel lives. Another miss for the same key after this
/// window causes another background fetch to be enqueued.
pub const SENTINEL_TTL_SECS: i32 = 30;

/// A decoded stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A fill is in flight; there is no payload.
    Pending,
    /// A completed fill; the payload is the fetched body, verbatim.
    Ready(Bytes),
}

impl Record {
    /// Decodes a raw stored value.
    pub fn decode(raw: Bytes) -> Record {
        match raw.first() {
            Some(&flags) if flags & FLAG_PENDING != 0 => Record::Pending,
            Some(_) => Record::Ready(raw.slice(1..)),
            None => Record::Ready(Bytes::new()),
        }
    }

    /// Encodes the one-byte sentinel record.
    pub fn sentinel() -> Bytes {
        Bytes::from_static(&[FLAG_PENDING])
    }

    /// Encodes a completed record. The result is always exactly
    /// `1 + body.len()` bytes.
    pub fn ready(body: &[u8]) -> Bytes {
        let mut record = BytesMut::with_capacity(1 + body.len());
        record.put_u8(0);
        record.put_slice(body);
        record.freeze()
    }
}
