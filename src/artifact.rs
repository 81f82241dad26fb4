//! Replayable scenario artifacts.
//!
//! An artifact pairs a scenario with the trace and statistics it is expected
//! to produce. Artifacts are stored as JSON and replayed by the test corpus;
//! the schema is versioned so older files can be rejected cleanly.

use serde::{Deserialize, Serialize};

use crate::engine::Outcome;
use crate::error::RunError;
use crate::process::Pid;
use crate::scenario::Scenario;
use crate::trace::{trace_hash, Slice};

pub const SCHEMA_VERSION: u32 = 1;

/// Expected per-process numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedProcess {
    pub pid: Pid,
    pub waiting: u64,
    pub turnaround: u64,
}

/// Expected result of replaying a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expected {
    pub trace: Vec<Slice>,
    pub processes: Vec<ExpectedProcess>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
}

impl Expected {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            trace: outcome.trace.clone(),
            processes: outcome
                .report
                .processes
                .iter()
                .map(|p| ExpectedProcess {
                    pid: p.pid,
                    waiting: p.waiting,
                    turnaround: p.turnaround,
                })
                .collect(),
            avg_waiting: outcome.report.avg_waiting,
            avg_turnaround: outcome.report.avg_turnaround,
        }
    }
}

/// Self-contained reproduction artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReproArtifact {
    pub schema_version: u32,
    /// Free-form description of what the case covers.
    #[serde(default)]
    pub note: String,
    pub scenario: Scenario,
    pub expected: Expected,
}

/// How a replay diverged from its artifact.
#[derive(Clone, Debug, PartialEq)]
pub enum Mismatch {
    Schema { found: u32 },
    Run(RunError),
    Trace { expected_hash: u64, actual_hash: u64 },
    Stats { expected: Vec<ExpectedProcess>, actual: Vec<ExpectedProcess> },
    Averages { expected: (f64, f64), actual: (f64, f64) },
}

impl ReproArtifact {
    /// Record `scenario`'s current behaviour as an artifact.
    pub fn capture(scenario: Scenario, note: impl Into<String>) -> Result<Self, RunError> {
        let outcome = scenario.run()?;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            note: note.into(),
            expected: Expected::from_outcome(&outcome),
            scenario,
        })
    }

    /// Re-run the scenario and compare against the recorded expectation.
    pub fn replay(&self) -> Result<(), Mismatch> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(Mismatch::Schema {
                found: self.schema_version,
            });
        }
        let outcome = self.scenario.run().map_err(Mismatch::Run)?;
        let actual = Expected::from_outcome(&outcome);

        let (expected_hash, actual_hash) =
            (trace_hash(&self.expected.trace), trace_hash(&actual.trace));
        if expected_hash != actual_hash {
            return Err(Mismatch::Trace {
                expected_hash,
                actual_hash,
            });
        }
        if self.expected.processes != actual.processes {
            return Err(Mismatch::Stats {
                expected: self.expected.processes.clone(),
                actual: actual.processes,
            });
        }
        let expected_avgs = (self.expected.avg_waiting, self.expected.avg_turnaround);
        let actual_avgs = (actual.avg_waiting, actual.avg_turnaround);
        if (expected_avgs.0 - actual_avgs.0).abs() > 1e-9
            || (expected_avgs.1 - actual_avgs.1).abs() > 1e-9
        {
            return Err(Mismatch::Averages {
                expected: expected_avgs,
                actual: actual_avgs,
            });
        }
        Ok(())
    }
}
