//! Stage ready structure (the dispatch list).
//!
//! # Layout
//!
//! Three insertion-ordered runs, one per [`Stage`], read as a single list:
//!
//! ```text
//! [ stage 1 run ][ stage 2 run ][ stage 3 run ]
//!   ^ head                         tail of stage 3 ^
//! ```
//!
//! Each run is its own `VecDeque`, so appending to a stage is O(1) whether or
//! not any other run is empty, and the head of the whole list is the front
//! of the first non-empty run.
//!
//! # Invariants
//! - Every stage-1 entry precedes every stage-2 entry, which precedes every
//!   stage-3 entry.
//! - Within a run, order is the order entries were appended.
//! - An entry's `stage` field matches the run it sits in.

use std::collections::VecDeque;

use crate::process::{Process, Stage};

/// Ready processes partitioned by stage.
#[derive(Clone, Debug, Default)]
pub struct DispatchList {
    runs: [VecDeque<Process>; 3],
}

impl DispatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail of `stage`'s run and tag the process with it.
    pub fn append_to_stage(&mut self, stage: Stage, mut process: Process) {
        process.stage = stage;
        self.runs[stage.index()].push_back(process);
    }

    /// Remove the head of the list: the earliest-queued process of the
    /// earliest non-empty stage.
    pub fn pop_front(&mut self) -> Option<Process> {
        self.runs.iter_mut().find_map(VecDeque::pop_front)
    }

    /// Stage of the current head, if any.
    pub fn peek_front_stage(&self) -> Option<Stage> {
        self.front().map(Process::stage)
    }

    pub fn front(&self) -> Option<&Process> {
        self.runs.iter().find_map(VecDeque::front)
    }

    pub fn front_mut(&mut self) -> Option<&mut Process> {
        self.runs.iter_mut().find_map(VecDeque::front_mut)
    }

    /// Credit `delta` waiting ticks to every entry except the head.
    ///
    /// Returns the total credited so the caller can keep running sums. The
    /// total is `delta * (len - 1)` and can exceed `u64` even when every
    /// per-process wait fits.
    pub fn credit_waiting(&mut self, delta: u64) -> u128 {
        let mut credited = 0u128;
        for process in self.iter_mut().skip(1) {
            process.waiting += delta;
            credited += delta as u128;
        }
        credited
    }

    /// Number of entries in one stage's run.
    #[inline]
    pub fn stage_len(&self, stage: Stage) -> usize {
        self.runs[stage.index()].len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.runs.iter().map(VecDeque::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(VecDeque::is_empty)
    }

    /// Entries in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.runs.iter().flat_map(VecDeque::iter)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.runs.iter_mut().flat_map(VecDeque::iter_mut)
    }
}
