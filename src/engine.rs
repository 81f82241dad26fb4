//! Three-stage multilevel feedback queue engine.
//!
//! # Model
//!
//! The engine owns every piece of run state: the simulated clock, the
//! admission queue of processes that have not arrived yet, the dispatch list
//! of ready processes, the completed set, and the shared stage-2 budget
//! timer. Each call to [`Engine::step`] is one scheduling decision:
//!
//! 1. Pick the head of the dispatch list.
//! 2. Size its slice from the head's stage:
//!    - stage 1: `min(q1, remaining)`
//!    - stage 2: `min(q2, budget, remaining, gap to next arrival)`
//!    - stage 3: `min(remaining, gap to next arrival)`
//! 3. Run it: advance the clock, credit the slice to every other ready
//!    process as waiting time.
//! 4. Admit arrivals that became due into stage 1, crediting each with the
//!    time between its arrival and the end of the slice.
//! 5. Re-file the head: demote, leave in place, or complete.
//!
//! # Stage transitions
//!
//! | Stage | Finished   | Budget/quantum used up | Otherwise         |
//! |-------|------------|------------------------|-------------------|
//! | 1     | complete   | stage-2 tail           | stage-2 tail      |
//! | 2     | complete*  | stage-3 tail*          | keep head of run  |
//! | 3     | complete   | n/a                    | keep head of run  |
//!
//! `*` resets the stage-2 budget to `q2`.
//!
//! # Invariants
//! - The clock never moves backwards and slices never overlap.
//! - A process's stage only moves forward.
//! - Whenever a decision is made, every arrival at or before `now` has been
//!   admitted, so the gap to the next arrival is at least one tick.
//!
//! Violations are reported as [`EngineError`]; the engine then stops.

use std::iter::FusedIterator;

use crate::admission::AdmissionQueue;
use crate::clock::SimClock;
use crate::completed::CompletedSet;
use crate::config::{validate_workload, MlfqConfig};
use crate::dispatch::DispatchList;
use crate::error::{ConfigError, EngineError, RunError};
use crate::process::{Process, ProcessSpec, Stage};
use crate::report::Report;
use crate::trace::{Slice, TraceRing};

/// Where the running process goes once its slice ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Disposition {
    /// Stays at the head of its stage run.
    Keep,
    /// Leaves the head and joins the tail of the given stage.
    Demote(Stage),
    /// Leaves for the completed set.
    Complete,
}

/// One simulation run. Construct a fresh engine per run.
#[derive(Debug)]
pub struct Engine {
    cfg: MlfqConfig,
    clock: SimClock,
    admission: AdmissionQueue,
    ready: DispatchList,
    completed: CompletedSet,
    /// Stage-2 service left before the current stage-2 head is demoted.
    stage2_budget: u64,
    total_waiting: u128,
    process_count: usize,
    ring: TraceRing,
    started: bool,
    failure: Option<EngineError>,
}

impl Engine {
    /// Validate the configuration and workload and build a ready-to-run engine.
    pub fn new(cfg: MlfqConfig, processes: &[ProcessSpec]) -> Result<Self, ConfigError> {
        cfg.validate()?;
        validate_workload(processes)?;

        let admission: AdmissionQueue = processes.iter().copied().map(Process::new).collect();
        Ok(Self {
            cfg,
            clock: SimClock::new(),
            admission,
            ready: DispatchList::new(),
            completed: CompletedSet::new(),
            stage2_budget: cfg.q2,
            total_waiting: 0,
            process_count: processes.len(),
            ring: TraceRing::new(cfg.trace_capacity),
            started: false,
            failure: None,
        })
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Remaining shared stage-2 budget.
    #[inline]
    pub fn stage2_budget(&self) -> u64 {
        self.stage2_budget
    }

    #[inline]
    pub fn config(&self) -> &MlfqConfig {
        &self.cfg
    }

    /// Ready processes in dispatch order.
    pub fn ready(&self) -> &DispatchList {
        &self.ready
    }

    /// Processes that have not arrived yet.
    pub fn pending(&self) -> usize {
        self.admission.len()
    }

    pub fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    /// The most recent slices, oldest first.
    pub fn recent_trace(&self) -> Vec<Slice> {
        self.ring.dump()
    }

    /// True once every process has completed or the engine has failed.
    pub fn is_done(&self) -> bool {
        self.failure.is_some() || (self.ready.is_empty() && self.admission.is_empty())
    }

    /// Make one scheduling decision.
    ///
    /// Returns the slice that ran, or `None` once the simulation is over.
    /// After an error the engine is stopped and keeps returning `None`.
    pub fn step(&mut self) -> Result<Option<Slice>, EngineError> {
        if self.failure.is_some() {
            return Ok(None);
        }
        match self.decide() {
            Ok(slice) => Ok(slice),
            Err(err) => {
                log::warn!(
                    "invariant violation at t={}: {err}; recent slices: {:?}",
                    self.clock.now(),
                    self.ring.dump()
                );
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Run to completion and produce the final report.
    pub fn finish(mut self) -> Result<Report, EngineError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        while self.step()?.is_some() {}
        Ok(Report::build(
            self.completed,
            self.total_waiting,
            self.clock.now(),
        ))
    }

    fn decide(&mut self) -> Result<Option<Slice>, EngineError> {
        if !self.started {
            self.started = true;
            self.idle_until_next_arrival();
        }

        if self.ready.is_empty() {
            if self.admission.is_empty() {
                if self.completed.len() != self.process_count {
                    return Err(EngineError::LostWork {
                        outstanding: self.process_count - self.completed.len(),
                    });
                }
                return Ok(None);
            }
            self.idle_until_next_arrival();
        }

        let now = self.clock.now();
        let gap = self.admission.next_arrival().map(|at| at.saturating_sub(now));
        let budget = self.stage2_budget;
        let q1 = self.cfg.q1;
        let q2 = self.cfg.q2;

        let outstanding = self.process_count - self.completed.len();
        let head = self
            .ready
            .front()
            .ok_or(EngineError::LostWork { outstanding })?;
        let (pid, stage, remaining) = (head.pid(), head.stage(), head.remaining());

        if self.completed.contains(pid) {
            return Err(EngineError::CompletedRedispatched { pid });
        }
        if head.arrival() > now {
            return Err(EngineError::EarlyDispatch {
                pid,
                arrival: head.arrival(),
                at: now,
            });
        }

        let len = match stage {
            Stage::One => q1.min(remaining),
            Stage::Two => cap_at_gap(q2.min(budget).min(remaining), gap),
            Stage::Three => cap_at_gap(remaining, gap),
        };
        if len == 0 {
            return Err(EngineError::EmptySlice { pid, stage, at: now });
        }

        let start = now;
        let end = self.clock.advance_by(len);
        let left = match self.ready.front_mut() {
            Some(head) => {
                head.run_for(len);
                head.remaining()
            }
            None => return Err(EngineError::LostWork { outstanding }),
        };
        self.total_waiting += self.ready.credit_waiting(len);

        let disposition = match stage {
            Stage::One if left == 0 => Disposition::Complete,
            Stage::One => Disposition::Demote(Stage::Two),
            Stage::Two => {
                self.stage2_budget -= len;
                if left == 0 {
                    self.stage2_budget = q2;
                    Disposition::Complete
                } else if self.stage2_budget == 0 {
                    self.stage2_budget = q2;
                    Disposition::Demote(Stage::Three)
                } else {
                    Disposition::Keep
                }
            }
            Stage::Three if left == 0 => Disposition::Complete,
            Stage::Three => Disposition::Keep,
        };

        let slice = Slice {
            start,
            end,
            pid,
            stage,
        };
        log::debug!(
            "t={start}..{end} pid={pid} stage={} remaining={left} -> {disposition:?}",
            stage.number()
        );
        self.ring.push(slice);

        let leaving = match disposition {
            Disposition::Keep => None,
            Disposition::Demote(_) | Disposition::Complete => self.ready.pop_front(),
        };
        self.admit_due();

        if let Some(mut process) = leaving {
            match disposition {
                Disposition::Demote(to) => {
                    if to < process.stage() {
                        return Err(EngineError::StageRegression {
                            pid,
                            from: process.stage(),
                            to,
                        });
                    }
                    self.ready.append_to_stage(to, process);
                }
                _ => {
                    process.completed_at = Some(end);
                    self.completed.insert(process);
                }
            }
        }

        Ok(Some(slice))
    }

    /// Jump the clock to the next arrival when nothing is ready.
    fn idle_until_next_arrival(&mut self) {
        if let Some(at) = self.admission.next_arrival() {
            if at > self.clock.now() {
                log::debug!("idle t={}..{at}", self.clock.now());
                self.clock.advance_to(at);
            }
        }
        self.admit_due();
    }

    /// Move every due arrival into stage 1, crediting the wait since arrival.
    fn admit_due(&mut self) {
        let now = self.clock.now();
        while let Some(mut process) = self.admission.pop_due(now) {
            let waited = now - process.arrival();
            process.waiting += waited;
            self.total_waiting += waited as u128;
            log::trace!(
                "admit pid={} arrival={} waited={waited}",
                process.pid(),
                process.arrival()
            );
            self.ready.append_to_stage(Stage::One, process);
        }
    }
}

#[inline(always)]
fn cap_at_gap(len: u64, gap: Option<u64>) -> u64 {
    match gap {
        Some(gap) => len.min(gap),
        None => len,
    }
}

impl Iterator for Engine {
    type Item = Result<Slice, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}

impl FusedIterator for Engine {}

/// Trace and statistics of a complete run.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub trace: Vec<Slice>,
    pub report: Report,
}

/// Simulate `processes` to completion.
pub fn simulate(cfg: MlfqConfig, processes: &[ProcessSpec]) -> Result<Outcome, RunError> {
    let mut engine = Engine::new(cfg, processes)?;
    let mut trace = Vec::new();
    while let Some(slice) = engine.step()? {
        trace.push(slice);
    }
    let report = engine.finish()?;
    Ok(Outcome { trace, report })
}
