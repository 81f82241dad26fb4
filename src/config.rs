//! Quantum configuration and workload validation.
//!
//! Everything here runs before the first slice is scheduled. A run either
//! starts with a fully valid configuration or does not start at all.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::process::{ProcessSpec, Stage};

/// Default stage-1 quantum.
pub const DEFAULT_Q1: u64 = 4;
/// Default stage-2 quantum and budget.
pub const DEFAULT_Q2: u64 = 8;
/// Default number of slices retained in the diagnostic trace ring.
pub const DEFAULT_TRACE_CAPACITY: usize = 256;

/// Scheduler configuration for one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlfqConfig {
    /// Stage-1 round-robin quantum.
    pub q1: u64,
    /// Stage-2 quantum; also the size of the shared stage-2 budget timer.
    pub q2: u64,
    /// Slices kept in the engine's trace ring for failure diagnostics.
    pub trace_capacity: usize,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            q1: DEFAULT_Q1,
            q2: DEFAULT_Q2,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

impl MlfqConfig {
    pub fn new(q1: u64, q2: u64) -> Self {
        Self {
            q1,
            q2,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.q1 == 0 {
            return Err(ConfigError::ZeroQuantum { stage: Stage::One });
        }
        if self.q2 == 0 {
            return Err(ConfigError::ZeroQuantum { stage: Stage::Two });
        }
        Ok(())
    }
}

/// Reject workloads the engine cannot simulate.
///
/// Checks, in input order: positive burst, unique pid, and that the latest
/// possible completion time fits in a `u64`.
pub fn validate_workload(processes: &[ProcessSpec]) -> Result<(), ConfigError> {
    if processes.is_empty() {
        return Err(ConfigError::EmptyWorkload);
    }

    let mut seen = BTreeSet::new();
    let mut last_arrival: u64 = 0;
    let mut total_burst: u64 = 0;
    for spec in processes {
        if spec.burst == 0 {
            return Err(ConfigError::ZeroBurst { pid: spec.pid });
        }
        if !seen.insert(spec.pid) {
            return Err(ConfigError::DuplicatePid { pid: spec.pid });
        }
        // The clock can never pass the last arrival plus all service.
        last_arrival = last_arrival.max(spec.arrival);
        total_burst = total_burst
            .checked_add(spec.burst)
            .ok_or(ConfigError::TimeOverflow { pid: spec.pid })?;
        last_arrival
            .checked_add(total_burst)
            .ok_or(ConfigError::TimeOverflow { pid: spec.pid })?;
    }
    Ok(())
}
