//! Final statistics handed to reporting.

use serde::{Deserialize, Serialize};

use crate::completed::CompletedSet;
use crate::process::{Pid, Stage};

/// Per-process outcome of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival: u64,
    pub waiting: u64,
    pub burst: u64,
    /// Always `waiting + burst`.
    pub turnaround: u64,
    pub completion: u64,
    /// Highest stage the process reached.
    pub final_stage: Stage,
}

/// Statistics for a complete run, ordered by pid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub processes: Vec<ProcessStats>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    /// Sum of every waiting-time credit made during the run.
    pub total_waiting: u128,
    /// Clock value when the last process finished.
    pub end_time: u64,
}

impl Report {
    pub(crate) fn build(completed: CompletedSet, total_waiting: u128, end_time: u64) -> Self {
        let processes: Vec<ProcessStats> = completed
            .into_vec()
            .into_iter()
            .map(|p| ProcessStats {
                pid: p.pid(),
                arrival: p.arrival(),
                waiting: p.waiting(),
                burst: p.total_burst(),
                turnaround: p.turnaround(),
                completion: p.completed_at().unwrap_or(end_time),
                final_stage: p.stage(),
            })
            .collect();

        let (avg_waiting, avg_turnaround) = if processes.is_empty() {
            (0.0, 0.0)
        } else {
            let n = processes.len() as f64;
            let total_burst: u128 = processes.iter().map(|p| p.burst as u128).sum();
            (
                total_waiting as f64 / n,
                (total_waiting + total_burst) as f64 / n,
            )
        };

        Self {
            processes,
            avg_waiting,
            avg_turnaround,
            total_waiting,
            end_time,
        }
    }

    /// Stats for one pid.
    pub fn get(&self, pid: Pid) -> Option<&ProcessStats> {
        self.processes
            .binary_search_by_key(&pid, |p| p.pid)
            .ok()
            .map(|idx| &self.processes[idx])
    }
}
