//! A discrete-event multi-core job scheduler simulator.
//!
//! A host drives an [`Engine`] with three event types — job arrival
//! ([`Engine::new_job`]), job completion ([`Engine::job_finished`]), and
//! quantum expiration ([`Engine::quantum_expired`]) — and queries the three
//! aggregate performance metrics once the run is over. Six scheduling
//! disciplines are supported, differing along selection policy (arrival
//! order, shortest remaining work, priority, round-robin) and preemption
//! (non-preemptive vs preemptive); see [`Scheme`].
//!
//! The engine is purely sequential in virtual time: it never reads a real
//! clock, spawns a thread, or blocks. The `cli` and `scenario` modules are a
//! reference host driver (a CSV scenario reader and a small discrete-event
//! loop) that exercises the library end to end; neither is required to use
//! the library itself.

pub mod cli;
pub mod comparator;
pub mod engine;
pub mod error;
pub mod job;
pub mod scenario;
pub mod store;

pub use comparator::Comparator;
pub use engine::{Engine, Scheme};
pub use error::ScenarioError;
pub use job::{Job, JobId, Priority, Time};
pub use scenario::ScenarioJob;
pub use store::OrderedJobStore;
