//! Process records and scheduling stages.
//!
//! A [`ProcessSpec`] is the caller-supplied definition of a process. The
//! engine turns it into a [`Process`], which adds the runtime counters that
//! change while the simulation runs.

use serde::{Deserialize, Serialize};

/// Caller-assigned process identifier.
pub type Pid = u32;

/// Feedback stage a process is queued or running in.
///
/// Ordering follows scheduling privilege: `One` is served before `Two`,
/// which is served before `Three`. A process only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stage {
    /// Round robin with the stage-1 quantum; one slice, then demotion.
    One,
    /// Round robin under the shared stage-2 budget timer.
    Two,
    /// First come, first served to completion.
    Three,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::One, Stage::Two, Stage::Three];

    /// 1-based stage number used in traces and reports.
    #[inline(always)]
    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
            Stage::Three => 3,
        }
    }

    /// 0-based index into per-stage tables.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.number() as usize - 1
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.number()
    }
}

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stage::One),
            2 => Ok(Stage::Two),
            3 => Ok(Stage::Three),
            other => Err(format!("stage must be 1, 2 or 3 (got {other})")),
        }
    }
}

/// Input definition of a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub pid: Pid,
    pub arrival: u64,
    pub burst: u64,
}

impl ProcessSpec {
    pub fn new(pid: Pid, arrival: u64, burst: u64) -> Self {
        Self {
            pid,
            arrival,
            burst,
        }
    }
}

/// A process as tracked by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    arrival: u64,
    total_burst: u64,
    /// Service still owed; 0 means finished.
    pub(crate) remaining: u64,
    /// Time spent admitted but not running.
    pub(crate) waiting: u64,
    pub(crate) stage: Stage,
    /// Set when the process enters the completed set.
    pub(crate) completed_at: Option<u64>,
}

impl Process {
    pub fn new(spec: ProcessSpec) -> Self {
        Self {
            pid: spec.pid,
            arrival: spec.arrival,
            total_burst: spec.burst,
            remaining: spec.burst,
            waiting: 0,
            stage: Stage::One,
            completed_at: None,
        }
    }

    #[inline(always)]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline(always)]
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    #[inline(always)]
    pub fn total_burst(&self) -> u64 {
        self.total_burst
    }

    #[inline(always)]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[inline(always)]
    pub fn waiting(&self) -> u64 {
        self.waiting
    }

    #[inline(always)]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline(always)]
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Turnaround once complete: waiting plus total service.
    #[inline(always)]
    pub fn turnaround(&self) -> u64 {
        self.waiting + self.total_burst
    }

    /// Consume `len` units of service.
    #[inline(always)]
    pub(crate) fn run_for(&mut self, len: u64) {
        debug_assert!(len <= self.remaining);
        self.remaining -= len;
    }
}
