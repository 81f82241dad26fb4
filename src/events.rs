//! Structured run events, encoders, and output sinks.
//!
//! # Architecture
//!
//! The driver emits [`SimEvent`] values through an [`EventSink`]. The sink
//! owns a writer and an [`EventEncoder`] that turns each event into bytes:
//!
//! - [`TextEncoder`] prints a Gantt chart line per slice followed by the
//!   averages and one report row per process.
//! - [`JsonlEncoder`] writes one JSON object per line.
//!
//! # Wire format (JSONL)
//!
//! ```text
//! {"type":"slice","start":0,"end":2,"pid":1,"stage":1}
//! {"type":"summary","processes":2,"end_time":8,"avg_waiting":3.0,"avg_turnaround":7.0}
//! {"type":"process","pid":1,"arrival":0,"waiting":2,"burst":5,"turnaround":7,...}
//! ```

use std::fmt::Write as _;
use std::io::{self, BufWriter, ErrorKind, Write};

use serde::Serialize;

use crate::report::{ProcessStats, Report};
use crate::trace::Slice;

/// Structured event emitted while driving a simulation.
#[derive(Clone, Debug)]
pub enum SimEvent<'a> {
    Slice(Slice),
    Summary(SummaryEvent),
    Completed(ProcessStats),
    Diagnostic(DiagnosticEvent<'a>),
}

/// Run-wide averages, emitted once at the end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryEvent {
    pub processes: usize,
    pub end_time: u64,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
}

impl SummaryEvent {
    pub fn from_report(report: &Report) -> Self {
        Self {
            processes: report.processes.len(),
            end_time: report.end_time,
            avg_waiting: report.avg_waiting,
            avg_turnaround: report.avg_turnaround,
        }
    }
}

/// Free-form message, e.g. a failure explanation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiagnosticEvent<'a> {
    pub level: &'static str,
    pub message: &'a str,
}

/// Encodes a [`SimEvent`] into bytes.
pub trait EventEncoder {
    /// Append the encoded representation of `event` to `buf`.
    fn encode(&self, event: &SimEvent<'_>, buf: &mut String);
}

/// Output sink for simulation events.
pub trait EventSink {
    fn emit(&mut self, event: &SimEvent<'_>) -> io::Result<()>;
    /// Flush buffered output. Called once at the end of a run.
    fn flush(&mut self) -> io::Result<()>;
}

// ============================================================================
// Text encoder
// ============================================================================

/// Human-readable Gantt chart and report.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextEncoder;

impl EventEncoder for TextEncoder {
    fn encode(&self, event: &SimEvent<'_>, buf: &mut String) {
        // Writing into a String cannot fail.
        let _ = match event {
            SimEvent::Slice(s) => writeln!(
                buf,
                "{} to {}: {}\t-- Stage {}",
                s.start,
                s.end,
                s.pid,
                s.stage.number()
            ),
            SimEvent::Summary(s) => writeln!(
                buf,
                "\nAvg Wait Time : {:.3}\tAvg Turnaround Time :  {:.3}\n",
                s.avg_waiting, s.avg_turnaround
            ),
            SimEvent::Completed(p) => writeln!(
                buf,
                "PID: {}\tAr_time: {}\tWait Time: {}\tBurst Time: {}\tTurnaround Time: {}",
                p.pid, p.arrival, p.waiting, p.burst, p.turnaround
            ),
            SimEvent::Diagnostic(d) => writeln!(buf, "{}: {}", d.level, d.message),
        };
    }
}

// ============================================================================
// JSONL encoder
// ============================================================================

/// One JSON object per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonlEncoder;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Wire<'e, 'a> {
    Slice(&'e Slice),
    Summary(&'e SummaryEvent),
    #[serde(rename = "process")]
    Completed(&'e ProcessStats),
    Diagnostic(&'e DiagnosticEvent<'a>),
}

impl EventEncoder for JsonlEncoder {
    fn encode(&self, event: &SimEvent<'_>, buf: &mut String) {
        let wire = match event {
            SimEvent::Slice(s) => Wire::Slice(s),
            SimEvent::Summary(s) => Wire::Summary(s),
            SimEvent::Completed(p) => Wire::Completed(p),
            SimEvent::Diagnostic(d) => Wire::Diagnostic(d),
        };
        match serde_json::to_string(&wire) {
            Ok(line) => buf.push_str(&line),
            Err(err) => {
                let _ = write!(
                    buf,
                    "{{\"type\":\"encode_error\",\"detail\":{}}}",
                    serde_json::Value::String(err.to_string())
                );
            }
        }
        buf.push('\n');
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Default buffer size (64 KiB) for buffered emission.
const DEFAULT_BUF_CAPACITY: usize = 64 * 1024;

/// Buffered sink writing encoded events to `W`.
///
/// A closed pipe (e.g. output piped into `head`) is not treated as an error.
pub struct WriterSink<W: Write, E: EventEncoder> {
    writer: BufWriter<W>,
    encoder: E,
    buf: String,
}

impl<W: Write, E: EventEncoder> WriterSink<W, E> {
    pub fn new(writer: W, encoder: E) -> Self {
        Self {
            writer: BufWriter::with_capacity(DEFAULT_BUF_CAPACITY, writer),
            encoder,
            buf: String::with_capacity(128),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

impl<W: Write, E: EventEncoder> EventSink for WriterSink<W, E> {
    fn emit(&mut self, event: &SimEvent<'_>) -> io::Result<()> {
        self.buf.clear();
        self.encoder.encode(event, &mut self.buf);
        ignore_broken_pipe(self.writer.write_all(self.buf.as_bytes()))
    }

    fn flush(&mut self) -> io::Result<()> {
        ignore_broken_pipe(self.writer.flush())
    }
}

fn ignore_broken_pipe(res: io::Result<()>) -> io::Result<()> {
    match res {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Sink that discards all events.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&mut self, _event: &SimEvent<'_>) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Emit a finished report: summary line, then one row per process.
pub fn emit_report(sink: &mut dyn EventSink, report: &Report) -> io::Result<()> {
    sink.emit(&SimEvent::Summary(SummaryEvent::from_report(report)))?;
    for stats in &report.processes {
        sink.emit(&SimEvent::Completed(*stats))?;
    }
    Ok(())
}
