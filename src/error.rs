//! Error types for the host-driver I/O boundary (scenario file parsing and
//! CLI argument validation). The engine itself never returns `Result`: a
//! malformed scenario file is an ordinary, expected failure for a CLI that
//! reads user-supplied input, but a contract violation against the engine's
//! own API is a programmer error and is handled with panics (see the design
//! notes on error handling).

use thiserror::Error;

/// Everything that can go wrong while turning a scenario file into an event
/// stream the [`crate::engine::Engine`] can be driven with.
#[derive(Error, Debug, PartialEq)]
pub enum ScenarioError {
    #[error("could not read scenario file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("line {line}: expected 4 comma-separated fields (job_id,arrival_time,running_time,priority), found {found}")]
    WrongFieldCount { line: usize, found: usize },

    #[error("line {line}: could not parse {field} {value:?} as an integer")]
    InvalidInteger { line: usize, field: &'static str, value: String },

    #[error("line {line}: running_time must be strictly positive, got {value}")]
    NonPositiveRunningTime { line: usize, value: i64 },

    #[error("line {line}: job id {job_id} was already used on an earlier line")]
    DuplicateJobId { line: usize, job_id: i64 },

    #[error("unknown scheduling scheme {0:?}; expected one of FCFS, SJF, PSJF, PRI, PPRI, RR")]
    UnknownScheme(String),

    #[error("num_cores must be strictly positive, got {0}")]
    NonPositiveCoreCount(i64),

    #[error("round-robin scheduling requires --quantum, but none was given")]
    MissingQuantum,
}
