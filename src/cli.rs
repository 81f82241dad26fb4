//! Command-line parsing and the run driver behind the `mlfq-sim` binary.
//!
//! Hand-rolled (no clap dependency), `--flag=value` style.
//!
//! # Grammar
//!
//! ```text
//! mlfq-sim run --input=<file> [--q1=<N>] [--q2=<N>] [--format=text|jsonl]
//!              [--trace-capacity=<N>]
//! mlfq-sim --help | -h
//! ```
//!
//! A bare positional argument after `run` is taken as `--input`.
//! Quantum flags override whatever the scenario file specifies.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::engine::Engine;
use crate::error::{RunError, ScenarioError};
use crate::events::{emit_report, DiagnosticEvent, EventSink, SimEvent};
use crate::report::Report;
use crate::scenario::Scenario;

/// Output encoding for run events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

/// Arguments of the `run` subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunArgs {
    pub input: PathBuf,
    pub q1: Option<u64>,
    pub q2: Option<u64>,
    pub trace_capacity: Option<usize>,
    pub format: OutputFormat,
}

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(RunArgs),
    Help,
}

/// Failures surfaced by the binary, each mapped to an exit code.
#[derive(Debug)]
#[non_exhaustive]
pub enum CliError {
    /// Bad command line.
    Usage(String),
    Scenario(ScenarioError),
    Run(RunError),
    /// Writing output failed.
    Io(io::Error),
}

impl CliError {
    /// 2 for invalid arguments or configuration, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Scenario(ScenarioError::Parse { .. } | ScenarioError::Json(_)) => 2,
            Self::Run(RunError::Config(_)) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Scenario(err) => write!(f, "failed to load scenario: {err}"),
            Self::Run(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(_) => None,
            Self::Scenario(err) => Some(err),
            Self::Run(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ScenarioError> for CliError {
    fn from(err: ScenarioError) -> Self {
        Self::Scenario(err)
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        Self::Run(err)
    }
}

pub fn usage(exe: &str) -> String {
    format!(
        "usage: {exe} run --input=<file> [OPTIONS]

Simulates a three-stage multilevel feedback queue over the processes in
<file> and prints the Gantt chart, averages, and per-process report.

OPTIONS:
    --input=<file>          Scenario file (.json, or 'pid arrival burst' lines)
    --q1=<N>                Stage-1 time quantum (overrides the scenario)
    --q2=<N>                Stage-2 time quantum (overrides the scenario)
    --trace-capacity=<N>    Slices kept for failure diagnostics
    --format=<text|jsonl>   Output format (default: text)
    --help, -h              Show this help message

Set RUST_LOG=debug to log every scheduling decision to stderr."
    )
}

/// Parse arguments (excluding the executable name).
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let first = match args.next() {
        Some(a) => a,
        None => return Err(CliError::Usage("expected a subcommand".to_string())),
    };

    match first.to_string_lossy().as_ref() {
        "--help" | "-h" => Ok(Command::Help),
        "run" => parse_run_args(args),
        other => Err(CliError::Usage(format!(
            "expected 'run' subcommand, got '{other}'"
        ))),
    }
}

fn parse_run_args(args: impl Iterator<Item = OsString>) -> Result<Command, CliError> {
    let mut run = RunArgs::default();
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if let Some(flag) = arg.to_str() {
            if let Some(rest) = flag.strip_prefix("--input=") {
                set_input(&mut input, PathBuf::from(rest))?;
                continue;
            }
            if let Some(rest) = flag.strip_prefix("--q1=") {
                run.q1 = Some(parse_positive(rest, "--q1")?);
                continue;
            }
            if let Some(rest) = flag.strip_prefix("--q2=") {
                run.q2 = Some(parse_positive(rest, "--q2")?);
                continue;
            }
            if let Some(rest) = flag.strip_prefix("--trace-capacity=") {
                run.trace_capacity = Some(parse_positive(rest, "--trace-capacity")? as usize);
                continue;
            }
            if let Some(rest) = flag.strip_prefix("--format=") {
                run.format = match rest {
                    "text" => OutputFormat::Text,
                    "jsonl" => OutputFormat::Jsonl,
                    _ => {
                        return Err(CliError::Usage(format!(
                            "invalid --format value: {rest} (expected text or jsonl)"
                        )))
                    }
                };
                continue;
            }
            match flag {
                "--help" | "-h" => return Ok(Command::Help),
                _ if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown flag: {flag}")))
                }
                _ => {}
            }
        }

        // Positional: treat as --input.
        set_input(&mut input, PathBuf::from(arg))?;
    }

    run.input = input.ok_or_else(|| CliError::Usage("--input is required".to_string()))?;
    Ok(Command::Run(run))
}

fn set_input(slot: &mut Option<PathBuf>, path: PathBuf) -> Result<(), CliError> {
    if slot.is_some() {
        return Err(CliError::Usage(
            "multiple inputs provided; use a single --input=<file>".to_string(),
        ));
    }
    *slot = Some(path);
    Ok(())
}

fn parse_positive(value: &str, flag: &str) -> Result<u64, CliError> {
    match value.parse::<u64>() {
        Ok(0) => Err(CliError::Usage(format!("{flag} must be >= 1"))),
        Ok(n) => Ok(n),
        Err(_) => Err(CliError::Usage(format!("invalid {flag} value: {value}"))),
    }
}

/// Load the scenario, apply overrides, and stream the run into `sink`.
///
/// Slices are emitted as the engine produces them; the report follows once
/// the run completes. On an engine failure a diagnostic is emitted before
/// the error is returned.
pub fn execute(args: &RunArgs, sink: &mut dyn EventSink) -> Result<Report, CliError> {
    let mut scenario = Scenario::load(&args.input)?;
    if let Some(q1) = args.q1 {
        scenario.config.q1 = q1;
    }
    if let Some(q2) = args.q2 {
        scenario.config.q2 = q2;
    }
    if let Some(cap) = args.trace_capacity {
        scenario.config.trace_capacity = cap;
    }
    log::info!(
        "simulating {} processes from {} (q1={}, q2={})",
        scenario.processes.len(),
        args.input.display(),
        scenario.config.q1,
        scenario.config.q2
    );

    let mut engine = Engine::new(scenario.config, &scenario.processes).map_err(RunError::from)?;
    for slice in engine.by_ref() {
        match slice {
            Ok(slice) => sink.emit(&SimEvent::Slice(slice))?,
            Err(err) => {
                let message = err.to_string();
                sink.emit(&SimEvent::Diagnostic(DiagnosticEvent {
                    level: "error",
                    message: &message,
                }))?;
                sink.flush()?;
                return Err(RunError::from(err).into());
            }
        }
    }

    let report = engine.finish().map_err(RunError::from)?;
    emit_report(sink, &report)?;
    sink.flush()?;
    Ok(report)
}
