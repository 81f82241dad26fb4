//! Deterministic three-stage multilevel feedback queue (MLFQ) simulator.
//!
//! ## Scope
//! Processes are admitted by arrival time into stage 1, demoted to stage 2
//! after one stage-1 slice, and to stage 3 once they exhaust the shared
//! stage-2 budget. The engine produces a Gantt trace of slices and the
//! waiting/turnaround statistics of every process.
//!
//! ## Key invariants
//! - Simulated time is a monotonic integer clock owned by one [`Engine`].
//! - Stage-1 work always runs before stage-2 work, which runs before stage 3.
//! - A process's stage never decreases, and it completes exactly once.
//! - For every process, `turnaround == waiting + burst`.
//! - Runs are pure functions of their input: same scenario, same trace.
//!
//! ## Flow
//! `ProcessSpec -> AdmissionQueue -> DispatchList -> Engine -> Slice* -> Report`
//!
//! ## Notable entry points
//! - [`simulate`]: run a workload to completion.
//! - [`Engine`]: step-by-step simulation, also an iterator of [`Slice`]s.
//! - [`Scenario`]: workloads loaded from JSON or text files.
//! - [`events`]: Gantt/report encoders used by the binary.

pub mod admission;
pub mod artifact;
pub mod cli;
pub mod clock;
pub mod completed;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod process;
pub mod report;
pub mod scenario;
pub mod trace;

#[cfg(any(test, feature = "sim-proptest"))]
pub mod test_utils;

pub use artifact::{ReproArtifact, SCHEMA_VERSION};
pub use config::MlfqConfig;
pub use engine::{simulate, Engine, Outcome};
pub use error::{ConfigError, EngineError, RunError, ScenarioError};
pub use process::{Pid, Process, ProcessSpec, Stage};
pub use report::{ProcessStats, Report};
pub use scenario::Scenario;
pub use trace::{trace_hash, Slice};
