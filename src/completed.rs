//! Completed set, ordered by pid for reporting.

use crate::process::{Pid, Process};

/// Finished processes, kept sorted by pid.
///
/// Each insert lands at its sorted position; entries are never reordered
/// or removed afterwards.
#[derive(Clone, Debug, Default)]
pub struct CompletedSet {
    done: Vec<Process>,
}

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, process: Process) {
        debug_assert!(process.is_finished());
        let pid = process.pid();
        let idx = self.done.partition_point(|p| p.pid() <= pid);
        self.done.insert(idx, process);
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.done.binary_search_by_key(&pid, Process::pid).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.done.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.done.iter()
    }

    pub fn into_vec(self) -> Vec<Process> {
        self.done
    }
}
