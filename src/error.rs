//! Error types for the simulator.
//!
//! Errors are split by layer: configuration problems are rejected before a
//! run starts, engine errors describe internal invariant failures found while
//! stepping, and scenario errors come from loading workloads off disk. All
//! enums are `#[non_exhaustive]`; consumers should include a fallback arm.
//!
//! # Design Notes
//! - Nothing here is transient. A simulation is a pure function of its
//!   inputs, so an error is either a rejected input or an engine defect.
//! - I/O and JSON errors preserve their source.

use std::fmt;
use std::io;

use crate::process::{Pid, Stage};

/// Invalid workload or quantum configuration.
///
/// Returned before any slice is scheduled; no partial run is produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Stage-1 or stage-2 quantum is zero.
    ZeroQuantum { stage: Stage },
    /// A process requests no CPU service at all.
    ZeroBurst { pid: Pid },
    /// Two processes share the same pid.
    DuplicatePid { pid: Pid },
    /// The workload has no processes.
    EmptyWorkload,
    /// Arrival plus total burst does not fit in simulated time.
    TimeOverflow { pid: Pid },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroQuantum { stage } => {
                write!(f, "time quantum for stage {} must be positive", stage.number())
            }
            Self::ZeroBurst { pid } => write!(f, "process {pid} has a zero burst time"),
            Self::DuplicatePid { pid } => write!(f, "duplicate pid {pid}"),
            Self::EmptyWorkload => write!(f, "workload contains no processes"),
            Self::TimeOverflow { pid } => {
                write!(f, "process {pid} overflows the simulated clock")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Internal invariant failures detected while stepping the engine.
///
/// Any of these indicates a bug in the stage-transition logic. The engine
/// stops producing slices after reporting one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// Dispatch list and admission queue are both empty while work remains.
    LostWork { outstanding: usize },
    /// A process already in the completed set showed up in the dispatch list.
    CompletedRedispatched { pid: Pid },
    /// A slice of length zero was computed; the clock would not advance.
    EmptySlice { pid: Pid, stage: Stage, at: u64 },
    /// A process was filed into an earlier stage than it already reached.
    StageRegression { pid: Pid, from: Stage, to: Stage },
    /// A process was dispatched before it arrived.
    EarlyDispatch { pid: Pid, arrival: u64, at: u64 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LostWork { outstanding } => write!(
                f,
                "no runnable or pending process while {outstanding} process(es) remain unfinished"
            ),
            Self::CompletedRedispatched { pid } => {
                write!(f, "completed process {pid} re-entered the dispatch list")
            }
            Self::EmptySlice { pid, stage, at } => write!(
                f,
                "zero-length slice for process {pid} in stage {} at t={at}",
                stage.number()
            ),
            Self::StageRegression { pid, from, to } => write!(
                f,
                "process {pid} moved from stage {} back to stage {}",
                from.number(),
                to.number()
            ),
            Self::EarlyDispatch { pid, arrival, at } => write!(
                f,
                "process {pid} dispatched at t={at} before its arrival at t={arrival}"
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors from loading a scenario file.
#[derive(Debug)]
#[non_exhaustive]
pub enum ScenarioError {
    /// I/O error reading the scenario.
    Io(io::Error),
    /// JSON scenario could not be parsed.
    Json(serde_json::Error),
    /// A line of the text format is malformed.
    Parse { line: usize, detail: String },
}

impl ScenarioError {
    #[inline]
    pub fn io(err: io::Error) -> Self {
        Self::Io(err)
    }

    pub(crate) fn parse(line: usize, detail: impl Into<String>) -> Self {
        Self::Parse {
            line,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "invalid JSON scenario: {err}"),
            Self::Parse { line, detail } => write!(f, "line {line}: {detail}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for ScenarioError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Any failure of a complete run: rejected configuration or engine defect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunError {
    Config(ConfigError),
    Engine(EngineError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Engine(err) => write!(f, "invariant violation: {err}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Engine(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<EngineError> for RunError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}
