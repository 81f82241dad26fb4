//! Replays the hand-traced artifacts under `tests/simulation/corpus/`.

use std::fs;
use std::path::PathBuf;

use mlfq_sim::{ReproArtifact, Slice, Stage};

const CORPUS_DIR: &str = "tests/simulation/corpus";

/// Behaviours the corpus as a whole must exercise.
///
/// When the engine grows a new transition, add a flag here, teach
/// `observe` to detect it, and add an artifact that covers it.
#[derive(Default, Debug)]
struct CorpusCoverage {
    completes_in_stage_one: bool,
    completes_in_stage_two: bool,
    reaches_stage_three: bool,
    stage_two_capped_by_arrival: bool,
    stage_three_capped_by_arrival: bool,
    simultaneous_arrivals: bool,
    idle_gap: bool,
}

impl CorpusCoverage {
    fn observe(&mut self, artifact: &ReproArtifact) {
        let trace = &artifact.expected.trace;
        let processes = &artifact.scenario.processes;

        for (idx, slice) in trace.iter().enumerate() {
            let last_for_pid = !trace[idx + 1..].iter().any(|s| s.pid == slice.pid);
            match slice.stage {
                Stage::One if last_for_pid => self.completes_in_stage_one = true,
                Stage::Two if last_for_pid => self.completes_in_stage_two = true,
                Stage::Three => self.reaches_stage_three = true,
                _ => {}
            }
            let capped = processes.iter().any(|p| p.arrival == slice.end);
            if capped && slice.stage == Stage::Two && !last_for_pid {
                self.stage_two_capped_by_arrival = true;
            }
            if capped && slice.stage == Stage::Three && !last_for_pid {
                self.stage_three_capped_by_arrival = true;
            }
        }

        if trace.windows(2).any(|w| w[1].start > w[0].end) {
            self.idle_gap = true;
        }
        let mut arrivals: Vec<u64> = processes.iter().map(|p| p.arrival).collect();
        arrivals.sort_unstable();
        if arrivals.windows(2).any(|w| w[0] == w[1]) {
            self.simultaneous_arrivals = true;
        }
    }

    fn assert_complete(&self) {
        assert!(self.completes_in_stage_one, "{self:?}");
        assert!(self.completes_in_stage_two, "{self:?}");
        assert!(self.reaches_stage_three, "{self:?}");
        assert!(self.stage_two_capped_by_arrival, "{self:?}");
        assert!(self.stage_three_capped_by_arrival, "{self:?}");
        assert!(self.simultaneous_arrivals, "{self:?}");
        assert!(self.idle_gap, "{self:?}");
    }
}

fn load_corpus() -> Vec<(PathBuf, ReproArtifact)> {
    let entries = fs::read_dir(CORPUS_DIR).unwrap_or_else(|_| panic!("missing {CORPUS_DIR}"));
    let mut out = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let data = fs::read_to_string(&path).expect("read corpus");
        let artifact: ReproArtifact = serde_json::from_str(&data)
            .unwrap_or_else(|err| panic!("parse artifact {path:?}: {err}"));
        out.push((path, artifact));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

/// Every artifact replays to its recorded trace and statistics.
#[test]
fn corpus_replays_match_expected() {
    let corpus = load_corpus();
    assert!(!corpus.is_empty(), "corpus is empty");

    let mut coverage = CorpusCoverage::default();
    for (path, artifact) in &corpus {
        if let Err(mismatch) = artifact.replay() {
            panic!("replay mismatch for {path:?}: {mismatch:?}");
        }
        coverage.observe(artifact);
    }
    coverage.assert_complete();
}

/// Recorded traces themselves respect the per-process accounting identities.
#[test]
fn corpus_expectations_are_self_consistent() {
    for (path, artifact) in load_corpus() {
        for spec in &artifact.scenario.processes {
            let served: u64 = artifact
                .expected
                .trace
                .iter()
                .filter(|s| s.pid == spec.pid)
                .map(Slice::len)
                .sum();
            assert_eq!(served, spec.burst, "{path:?} pid {}", spec.pid);

            let stats = artifact
                .expected
                .processes
                .iter()
                .find(|p| p.pid == spec.pid)
                .unwrap_or_else(|| panic!("{path:?} missing pid {}", spec.pid));
            assert_eq!(stats.turnaround, stats.waiting + spec.burst, "{path:?}");
        }
    }
}
