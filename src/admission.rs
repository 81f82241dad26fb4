//! Arrival admission queue.
//!
//! Holds processes that have not yet arrived, ordered by arrival time with
//! ties kept in insertion order. The engine drains it from the front as the
//! simulated clock passes each arrival.

use std::collections::VecDeque;

use crate::process::Process;

/// Processes waiting for their arrival time.
///
/// # Invariants
/// - Entries are sorted ascending by arrival time.
/// - Entries with equal arrival times keep the order they were inserted in.
#[derive(Clone, Debug, Default)]
pub struct AdmissionQueue {
    pending: VecDeque<Process>,
}

impl AdmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert behind every entry arriving at or before `process`.
    pub fn insert(&mut self, process: Process) {
        let at = process.arrival();
        // Equal arrivals go after existing ones, keeping FCFS for ties.
        let idx = self.pending.partition_point(|p| p.arrival() <= at);
        self.pending.insert(idx, process);
    }

    /// Head of the queue if it has arrived by `now`.
    pub fn peek_due(&self, now: u64) -> Option<&Process> {
        self.pending.front().filter(|p| p.arrival() <= now)
    }

    /// Remove and return the head if it has arrived by `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<Process> {
        if self.peek_due(now).is_some() {
            self.pending.pop_front()
        } else {
            None
        }
    }

    /// Arrival time of the next pending process.
    #[inline]
    pub fn next_arrival(&self) -> Option<u64> {
        self.pending.front().map(Process::arrival)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FromIterator<Process> for AdmissionQueue {
    fn from_iter<I: IntoIterator<Item = Process>>(iter: I) -> Self {
        let mut queue = Self::new();
        for process in iter {
            queue.insert(process);
        }
        queue
    }
}
