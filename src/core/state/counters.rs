// src/core/state/counters.rs

//! Sharded monotonic counters for the per-operation statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

/// The fixed enumeration of counted operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCountMacro)]
pub enum OpKind {
    Hit,
    Miss,
    Enqueue,
    Fetch,
    FetchFail,
    Flush,
}

/// One row of counters, one cell per op kind.
#[derive(Debug)]
struct CounterRow([AtomicU64; OpKind::COUNT]);

impl CounterRow {
    fn new() -> Self {
        Self(std::array::from_fn(|_| AtomicU64::new(0)))
    }

    fn incr(&self, op: OpKind) {
        self.0[op as usize].fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self, op: OpKind) -> u64 {
        self.0[op as usize].load(Ordering::Relaxed)
    }
}

/// Per-operation counters, sharded to keep session increments from
/// contending on one cache line.
///
/// Session workers write to a shard row selected by their slot; the fetch
/// path writes to a dedicated global row. Reads sum every row at the point
/// of a `stats` request; no snapshot isolation is provided.
#[derive(Debug)]
pub struct OpCounters {
    shards: Vec<CounterRow>,
    global: CounterRow,
}

impl OpCounters {
    /// Creates counters with one shard row per server worker slot.
    pub fn new(server_threads: usize) -> Self {
        Self {
            shards: (0..server_threads.max(1)).map(|_| CounterRow::new()).collect(),
            global: CounterRow::new(),
        }
    }

    /// Increments `op` in the shard row for `slot`. Any slot value is
    /// accepted; it is reduced modulo the shard count.
    pub fn incr(&self, slot: usize, op: OpKind) {
        self.shards[slot % self.shards.len()].incr(op);
    }

    /// Increments `op` in the global row. Used by the background fetch path,
    /// which has no session slot.
    pub fn incr_global(&self, op: OpKind) {
        self.global.incr(op);
    }

    /// Sums `op` across the global row and every shard row.
    pub fn sum(&self, op: OpKind) -> u64 {
        let sharded: u64 = self.shards.iter().map(|row| row.get(op)).sum();
        sharded + self.global.get(op)
    }
}
