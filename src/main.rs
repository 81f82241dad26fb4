//! MLFQ scheduling simulator CLI.
//!
//! Reads a workload, runs the three-stage multilevel feedback queue over it,
//! and prints the Gantt chart followed by the averages and per-process
//! report.
//!
//! # Output
//!
//! Text (default): one `"<start> to <end>: <pid>\t-- Stage <n>"` line per
//! slice, the averages, then one row per process ordered by pid.
//! JSONL (`--format=jsonl`): one JSON object per event.
//!
//! Diagnostics go to stderr through `RUST_LOG` (e.g. `RUST_LOG=debug`).
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `1`: I/O failure or internal invariant violation
//! - `2`: Invalid arguments, scenario syntax, or configuration

use std::env;
use std::io;

use mlfq_sim::cli::{self, CliError, Command, OutputFormat};
use mlfq_sim::events::{EventSink, JsonlEncoder, TextEncoder, WriterSink};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let mut args = env::args_os();
    let exe = args
        .next()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mlfq-sim".to_string());

    let run = match cli::parse_args(args) {
        Ok(Command::Run(run)) => run,
        Ok(Command::Help) => {
            println!("{}", cli::usage(&exe));
            return;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{}", cli::usage(&exe));
            std::process::exit(err.exit_code());
        }
    };

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn EventSink> = match run.format {
        OutputFormat::Text => Box::new(WriterSink::new(stdout, TextEncoder)),
        OutputFormat::Jsonl => Box::new(WriterSink::new(stdout, JsonlEncoder)),
    };

    if let Err(err) = cli::execute(&run, sink.as_mut()) {
        report_failure(&err);
    }
}

fn report_failure(err: &CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(err.exit_code());
}
