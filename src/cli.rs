//! Command-line arguments for the reference host driver, plus the small
//! scheme-name parser it needs since [`crate::engine::Scheme`] stays free of
//! any CLI-crate dependency (only the driver's I/O boundary deals in
//! `Result`, per the error handling design).
//!
//! Grounded on the teacher's `cli.rs`: a `clap::Parser` struct carrying
//! `env!("CARGO_PKG_*")` metadata.

use clap::Parser;

use crate::engine::Scheme;
use crate::error::ScenarioError;
use crate::job::Time;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(author = AUTHOR)]
#[command(about = "Multi-core job scheduler simulator", long_about = None)]
pub struct Args {
    /// CSV scenario file: job_id,arrival_time,running_time,priority per line
    #[arg(short, long)]
    pub scenario_file: String,

    /// Number of cores available to the simulated machine
    #[arg(short, long)]
    pub num_cores: u32,

    /// Scheduling scheme: one of FCFS, SJF, PSJF, PRI, PPRI, RR
    #[arg(long)]
    pub scheme: String,

    /// Quantum length, required when --scheme is RR
    #[arg(short, long)]
    pub quantum: Option<Time>,
}

/// Parses a scheme name case-insensitively. Kept outside `Scheme` itself so
/// the engine module carries no dependency on the error crate used at this
/// I/O boundary.
pub fn parse_scheme(name: &str) -> Result<Scheme, ScenarioError> {
    match name.to_ascii_uppercase().as_str() {
        "FCFS" => Ok(Scheme::Fcfs),
        "SJF" => Ok(Scheme::Sjf),
        "PSJF" => Ok(Scheme::Psjf),
        "PRI" => Ok(Scheme::Pri),
        "PPRI" => Ok(Scheme::Ppri),
        "RR" => Ok(Scheme::Rr),
        _ => Err(ScenarioError::UnknownScheme(name.to_string())),
    }
}
