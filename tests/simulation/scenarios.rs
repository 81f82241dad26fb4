//! End-to-end scenarios through the public API.

use std::io::Write;

use mlfq_sim::cli::{execute, OutputFormat, RunArgs};
use mlfq_sim::events::{JsonlEncoder, WriterSink};
use mlfq_sim::{
    simulate, trace_hash, ConfigError, Engine, MlfqConfig, ProcessSpec, RunError, Scenario, Slice,
    Stage,
};

fn spec(pid: u32, arrival: u64, burst: u64) -> ProcessSpec {
    ProcessSpec::new(pid, arrival, burst)
}

fn stages_of(trace: &[Slice], pid: u32) -> Vec<Stage> {
    trace.iter().filter(|s| s.pid == pid).map(|s| s.stage).collect()
}

#[test]
fn two_process_walkthrough() {
    let out = simulate(MlfqConfig::new(2, 3), &[spec(1, 0, 5), spec(2, 1, 3)]).unwrap();

    // P1 [0,2) stage 1, P2 [2,4) stage 1 with one unit left, then stage 2.
    assert_eq!(out.trace[0].pid, 1);
    assert_eq!((out.trace[1].start, out.trace[1].end, out.trace[1].pid), (2, 4, 2));
    assert_eq!(stages_of(&out.trace, 1), vec![Stage::One, Stage::Two]);
    assert_eq!(stages_of(&out.trace, 2), vec![Stage::One, Stage::Two]);

    let waits: Vec<(u32, u64)> = out.report.processes.iter().map(|p| (p.pid, p.waiting)).collect();
    assert_eq!(waits, vec![(1, 2), (2, 4)]);
    assert!((out.report.avg_turnaround - 7.0).abs() < 1e-9);
}

#[test]
fn single_process_boundaries() {
    let short = simulate(MlfqConfig::new(5, 5), &[spec(1, 2, 5)]).unwrap();
    assert_eq!(stages_of(&short.trace, 1), vec![Stage::One]);
    assert_eq!(short.report.processes[0].waiting, 0);
    assert_eq!(short.trace[0].start, 2);

    let long = simulate(MlfqConfig::new(5, 5), &[spec(1, 0, 6)]).unwrap();
    assert_eq!(stages_of(&long.trace, 1), vec![Stage::One, Stage::Two]);
    assert_eq!(long.report.processes[0].waiting, 0);
}

#[test]
fn simultaneous_arrivals_run_in_input_order() {
    let procs = [spec(30, 4, 2), spec(10, 4, 2), spec(20, 4, 2)];
    let out = simulate(MlfqConfig::new(2, 2), &procs).unwrap();
    let order: Vec<u32> = out.trace.iter().map(|s| s.pid).collect();
    assert_eq!(order, vec![30, 10, 20]);
    // Report is ordered by pid regardless of completion order.
    let pids: Vec<u32> = out.report.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![10, 20, 30]);
}

#[test]
fn reruns_are_bit_identical() {
    let procs = [
        spec(1, 0, 17),
        spec(2, 3, 6),
        spec(3, 3, 9),
        spec(4, 11, 2),
        spec(5, 40, 12),
    ];
    let a = simulate(MlfqConfig::new(3, 4), &procs).unwrap();
    let b = simulate(MlfqConfig::new(3, 4), &procs).unwrap();
    assert_eq!(trace_hash(&a.trace), trace_hash(&b.trace));
    assert_eq!(a, b);
}

#[test]
fn engine_streams_the_same_trace_as_simulate() {
    let procs = [spec(1, 0, 9), spec(2, 2, 4), spec(3, 5, 1)];
    let cfg = MlfqConfig::new(2, 3);
    let expected = simulate(cfg, &procs).unwrap();

    let mut engine = Engine::new(cfg, &procs).unwrap();
    let streamed: Vec<Slice> = engine.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(streamed, expected.trace);
    assert_eq!(engine.finish().unwrap(), expected.report);
}

#[test]
fn invalid_inputs_are_rejected_before_running() {
    let err = simulate(MlfqConfig::new(2, 0), &[spec(1, 0, 1)]).unwrap_err();
    assert_eq!(err, RunError::Config(ConfigError::ZeroQuantum { stage: Stage::Two }));

    let err = simulate(MlfqConfig::new(2, 2), &[spec(1, 0, 1), spec(2, 0, 0)]).unwrap_err();
    assert_eq!(err, RunError::Config(ConfigError::ZeroBurst { pid: 2 }));

    assert!(Engine::new(MlfqConfig::new(2, 2), &[]).is_err());
}

#[test]
fn text_scenario_file_runs_end_to_end() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "# classic example\nq1 2\nq2 3\n1 0 5\n2 1 3").unwrap();

    let scenario = Scenario::load(file.path()).unwrap();
    assert_eq!(scenario.config, MlfqConfig::new(2, 3));
    let out = scenario.run().unwrap();
    assert_eq!(out.report.end_time, 8);
}

#[test]
fn cli_jsonl_output_is_parseable() {
    let scenario = Scenario::new(
        MlfqConfig::new(4, 4),
        vec![spec(1, 0, 3), spec(2, 1, 9)],
    );
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(scenario.to_json().unwrap().as_bytes()).unwrap();

    let args = RunArgs {
        input: file.path().to_path_buf(),
        q2: Some(2),
        format: OutputFormat::Jsonl,
        ..RunArgs::default()
    };
    let mut sink = WriterSink::new(Vec::new(), JsonlEncoder);
    let report = execute(&args, &mut sink).unwrap();

    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let events: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let slices = events.iter().filter(|e| e["type"] == "slice").count();
    let rows = events.iter().filter(|e| e["type"] == "process").count();
    assert!(slices >= 3);
    assert_eq!(rows, 2);
    assert_eq!(report.processes.len(), 2);
    let summary = events
        .iter()
        .find(|e| e["type"] == "summary")
        .expect("summary event");
    assert_eq!(summary["processes"], 2);
}
