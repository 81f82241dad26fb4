//! Workload definitions loaded from disk.
//!
//! Two formats are accepted:
//!
//! - JSON (`.json`): a serialized [`Scenario`].
//! - Plain text (anything else): one `pid arrival burst` triple per line.
//!   `q1 <n>` and `q2 <n>` lines set the quanta. Blank lines and anything
//!   after `#` are ignored.
//!
//! ```text
//! # two processes, small quanta
//! q1 2
//! q2 3
//! 1 0 5
//! 2 1 3
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MlfqConfig;
use crate::engine::{simulate, Outcome};
use crate::error::{RunError, ScenarioError};
use crate::process::ProcessSpec;

/// A complete simulation input: quanta plus the process list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: MlfqConfig,
    pub processes: Vec<ProcessSpec>,
}

impl Scenario {
    pub fn new(config: MlfqConfig, processes: Vec<ProcessSpec>) -> Self {
        Self { config, processes }
    }

    /// Load a scenario, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let data = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&data)
        } else {
            Self::from_text(&data)
        }
    }

    pub fn from_json(data: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the line-oriented text format.
    pub fn from_text(data: &str) -> Result<Self, ScenarioError> {
        let mut scenario = Scenario::default();

        for (idx, raw) in data.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["q1", value] => scenario.config.q1 = parse_field(value, "q1", line_no)?,
                ["q2", value] => scenario.config.q2 = parse_field(value, "q2", line_no)?,
                [pid, arrival, burst] => scenario.processes.push(ProcessSpec {
                    pid: parse_field(pid, "pid", line_no)?,
                    arrival: parse_field(arrival, "arrival time", line_no)?,
                    burst: parse_field(burst, "burst time", line_no)?,
                }),
                _ => {
                    return Err(ScenarioError::parse(
                        line_no,
                        format!("expected 'pid arrival burst', got '{line}'"),
                    ))
                }
            }
        }

        Ok(scenario)
    }

    /// Run the scenario to completion.
    pub fn run(&self) -> Result<Outcome, RunError> {
        simulate(self.config, &self.processes)
    }
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    what: &str,
    line: usize,
) -> Result<T, ScenarioError> {
    value.parse().map_err(|_| {
        ScenarioError::parse(
            line,
            format!("invalid {what} '{value}' (expected a non-negative integer)"),
        )
    })
}
