//! Reads the CSV scenario dialect the reference host driver accepts:
//! `job_id,arrival_time,running_time,priority` lines, an optional header.
//!
//! Grounded on the teacher's `parser.rs` permissive header-skipping line
//! parser, with its `.expect(...)`-on-malformed-input style upgraded to a
//! `Result<_, ScenarioError>` since this module sits at a real I/O boundary
//! (a scenario file supplied by whoever runs the CLI), unlike the engine
//! itself, which trusts its caller's contract.

use std::collections::HashSet;
use std::fs::read_to_string;

use crate::error::ScenarioError;
use crate::job::{JobId, Priority, Time};

/// One line of a parsed scenario file: the arguments `new_job` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioJob {
    pub job_id: JobId,
    pub arrival_time: Time,
    pub running_time: Time,
    pub priority: Priority,
}

/// Parses `path` into a list of scenario jobs sorted ascending by
/// `arrival_time`, ready to be fed to `Engine::new_job` in order.
pub fn parse_scenario(path: &str) -> Result<Vec<ScenarioJob>, ScenarioError> {
    let raw_text = read_to_string(path)
        .map_err(|reason| ScenarioError::Unreadable { path: path.to_string(), reason: reason.to_string() })?;

    let mut jobs = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut allow_header = true;

    for (line_index, line) in raw_text.lines().enumerate() {
        let line_number = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }
        if allow_header {
            allow_header = false;
            if line.chars().any(|c| c.is_alphabetic()) {
                continue;
            }
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ScenarioError::WrongFieldCount { line: line_number, found: fields.len() });
        }

        let job_id = parse_field(line_number, "job_id", fields[0])?;
        let arrival_time = parse_field(line_number, "arrival_time", fields[1])?;
        let running_time = parse_field(line_number, "running_time", fields[2])?;
        let priority = parse_field(line_number, "priority", fields[3])?;

        if running_time <= 0 {
            return Err(ScenarioError::NonPositiveRunningTime { line: line_number, value: running_time });
        }
        if !seen_ids.insert(job_id) {
            return Err(ScenarioError::DuplicateJobId { line: line_number, job_id });
        }

        jobs.push(ScenarioJob { job_id, arrival_time, running_time, priority });
    }

    jobs.sort_by_key(|job| job.arrival_time);
    Ok(jobs)
}

fn parse_field(line: usize, field: &'static str, value: &str) -> Result<i64, ScenarioError> {
    value
        .parse::<i64>()
        .map_err(|_| ScenarioError::InvalidInteger { line, field, value: value.to_string() })
}
