//! Gantt trace events, a bounded trace ring, and trace hashing.
//!
//! Every scheduling decision produces one [`Slice`]. The engine hands slices
//! to its caller as they happen and also keeps the most recent ones in a
//! [`TraceRing`] so an invariant failure can be reported with context.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::process::{Pid, Stage};

/// One contiguous run of a process on the CPU, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slice {
    pub start: u64,
    pub end: u64,
    pub pid: Pid,
    pub stage: Stage,
}

impl Slice {
    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fixed-capacity ring buffer of slices.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceRing {
    cap: usize,
    buf: VecDeque<Slice>,
}

impl TraceRing {
    /// Create a trace ring with at least one slot.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            buf: VecDeque::with_capacity(cap),
        }
    }

    /// Maximum number of slices retained.
    #[inline(always)]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Push a slice, evicting the oldest if at capacity.
    #[inline(always)]
    pub fn push(&mut self, slice: Slice) {
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(slice);
    }

    /// Snapshot the ring contents in chronological order.
    pub fn dump(&self) -> Vec<Slice> {
        self.buf.iter().copied().collect()
    }
}

/// Stable 64-bit fingerprint of a trace.
///
/// Two runs over the same scenario must produce the same hash.
pub fn trace_hash(trace: &[Slice]) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for slice in trace {
        hasher.update(slice.start.to_le_bytes());
        hasher.update(slice.end.to_le_bytes());
        hasher.update(slice.pid.to_le_bytes());
        hasher.update([slice.stage.number()]);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(out)
}
