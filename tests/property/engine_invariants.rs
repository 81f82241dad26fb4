//! Invariants that must hold for every workload and quantum pair.
//!
//! Workloads are small random process sets; the engine's trace and report
//! are checked against accounting identities that do not depend on the
//! particular interleaving.

use proptest::prelude::*;

use mlfq_sim::test_utils::proptest_cases;
use mlfq_sim::{simulate, trace_hash, MlfqConfig, Outcome, ProcessSpec, Stage};

fn workload_strategy() -> impl Strategy<Value = Vec<ProcessSpec>> {
    proptest::collection::vec((0u64..40, 1u64..25), 1..12).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            // Descending pids so report order differs from input order.
            .map(|(idx, (arrival, burst))| ProcessSpec::new(1000 - idx as u32 * 7, arrival, burst))
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = MlfqConfig> {
    (1u64..7, 1u64..10).prop_map(|(q1, q2)| MlfqConfig::new(q1, q2))
}

fn run(cfg: MlfqConfig, procs: &[ProcessSpec]) -> Outcome {
    simulate(cfg, procs).expect("valid workload must simulate")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_cases(128)))]

    #[test]
    fn service_adds_up_to_burst(procs in workload_strategy(), cfg in config_strategy()) {
        let out = run(cfg, &procs);
        for p in &procs {
            let served: u64 = out.trace.iter().filter(|s| s.pid == p.pid).map(|s| s.len()).sum();
            prop_assert_eq!(served, p.burst);
        }
    }

    #[test]
    fn turnaround_identities_hold(procs in workload_strategy(), cfg in config_strategy()) {
        let out = run(cfg, &procs);
        prop_assert_eq!(out.report.processes.len(), procs.len());
        for p in &procs {
            let stats = out.report.get(p.pid).expect("every pid reported");
            prop_assert_eq!(stats.turnaround, stats.waiting + p.burst);
            prop_assert!(stats.turnaround >= p.burst);
            prop_assert_eq!(stats.completion - stats.arrival, stats.turnaround);
        }
        let total: u64 = out.report.processes.iter().map(|p| p.waiting).sum();
        prop_assert_eq!(total as u128, out.report.total_waiting);
        let n = procs.len() as f64;
        prop_assert!((out.report.avg_waiting - total as f64 / n).abs() < 1e-9);
        let pids: Vec<u32> = out.report.processes.iter().map(|p| p.pid).collect();
        let mut sorted = pids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(pids, sorted);
    }

    #[test]
    fn trace_is_chronological_and_gaps_are_idle(procs in workload_strategy(), cfg in config_strategy()) {
        let out = run(cfg, &procs);
        let first_arrival = procs.iter().map(|p| p.arrival).min().unwrap_or(0);
        prop_assert_eq!(out.trace[0].start, first_arrival);

        for w in out.trace.windows(2) {
            prop_assert!(w[0].start < w[0].end);
            prop_assert!(w[0].end <= w[1].start);
            if w[0].end < w[1].start {
                // Nothing may be waiting across an idle gap.
                for p in &procs {
                    let stats = out.report.get(p.pid).expect("reported");
                    let ready_in_gap = p.arrival <= w[0].end && stats.completion > w[0].end;
                    prop_assert!(!ready_in_gap, "pid {} was ready during idle gap", p.pid);
                }
                prop_assert!(procs.iter().any(|p| p.arrival == w[1].start));
            }
        }
    }

    #[test]
    fn stages_progress_monotonically(procs in workload_strategy(), cfg in config_strategy()) {
        let out = run(cfg, &procs);
        for p in &procs {
            let slices: Vec<_> = out.trace.iter().filter(|s| s.pid == p.pid).collect();
            prop_assert!(slices[0].start >= p.arrival);
            prop_assert_eq!(slices[0].stage, Stage::One);
            prop_assert_eq!(slices[0].len(), cfg.q1.min(p.burst));
            prop_assert!(slices.windows(2).all(|w| w[0].stage <= w[1].stage));
            prop_assert_eq!(slices.iter().filter(|s| s.stage == Stage::One).count(), 1);

            let stage2: u64 = slices.iter().filter(|s| s.stage == Stage::Two).map(|s| s.len()).sum();
            prop_assert!(stage2 <= cfg.q2);
            if slices.iter().any(|s| s.stage == Stage::Three) {
                // Stage 3 is only reachable by using up a full stage-2 budget.
                prop_assert_eq!(stage2, cfg.q2);
            }
        }
    }

    #[test]
    fn stage_one_work_preempts_later_stages(procs in workload_strategy(), cfg in config_strategy()) {
        let out = run(cfg, &procs);
        // A later-stage slice never starts while a stage-1 process is waiting.
        for (idx, slice) in out.trace.iter().enumerate() {
            if slice.stage == Stage::One {
                continue;
            }
            for p in &procs {
                let first = out.trace.iter().position(|s| s.pid == p.pid).expect("ran");
                let waiting_in_stage_one = p.arrival <= slice.start && first > idx;
                prop_assert!(!waiting_in_stage_one, "pid {} skipped by stage {:?}", p.pid, slice.stage);
            }
        }
    }

    #[test]
    fn simulation_is_deterministic(procs in workload_strategy(), cfg in config_strategy()) {
        let a = run(cfg, &procs);
        let b = run(cfg, &procs);
        prop_assert_eq!(trace_hash(&a.trace), trace_hash(&b.trace));
        prop_assert_eq!(a, b);
    }
}
