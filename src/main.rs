//! Reference host driver: reads a CSV scenario file, drives a [`core_sched_sim::Engine`]
//! through a small discrete-event loop that generates the arrival,
//! completion, and quantum-expiry events the library expects, then prints
//! the three aggregate metrics.
//!
//! Grounded on the teacher's `main.rs`: parse CLI args, read the input file,
//! run the computation, print a short human-readable summary.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use core_sched_sim::cli::{parse_scheme, Args};
use core_sched_sim::engine::Scheme;
use core_sched_sim::job::{JobId, Priority, Time};
use core_sched_sim::scenario::parse_scenario;
use core_sched_sim::Engine;

/// What a core-timeout event should do once it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeoutKind {
    Completion,
    QuantumExpiry,
}

#[derive(Debug, Clone)]
enum EventKind {
    Arrival { job_id: JobId, running_time: Time, priority: Priority },
    CoreTimeout { core_id: usize, job_id: JobId, generation: u64, kind: TimeoutKind },
}

/// A scheduled occurrence in virtual time. Ordered by `time`, then by
/// insertion sequence so that ties are resolved deterministically (events
/// for the same virtual timestamp are never expected to collide per the
/// library's ordering guarantees, but the tie-break keeps replay stable).
#[derive(Debug, Clone)]
struct ScheduledEvent {
    time: Time,
    seq: u64,
    kind: EventKind,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        (self.time, self.seq) == (other.time, other.seq)
    }
}
impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Drives `engine` through a chronological event stream built from
/// `scenario`, generating completion and (for round-robin) quantum-expiry
/// events as jobs are dispatched. A per-core generation counter lets stale
/// events left over from a pre-empted dispatch be silently discarded when
/// they would otherwise fire against a core that has since moved on.
///
/// `Engine::remaining_run_time` is only advanced internally by the engine
/// for `PSJF`'s own arrival-time bookkeeping; it is not kept live across
/// `RR` quantum ticks or `PPRI` preemptions (the engine has no use for that
/// once a job isn't ordered by remaining time). The driver is the one thing
/// in this whole simulation that actually advances virtual time, so it
/// tracks each job's true remaining work itself: `remaining` decremented by
/// elapsed ticks whenever a job stops running (quantum tick or eviction),
/// `running_since` recording when a job's current stint on a core began,
/// and `core_occupant` so an engine-side preemption (visible only as
/// `new_job` returning a core that used to belong to someone else) can be
/// charged against the job it displaced.
fn run_simulation(engine: &mut Engine, scenario: Vec<core_sched_sim::ScenarioJob>, quantum: Option<Time>) {
    let mut heap: BinaryHeap<Reverse<ScheduledEvent>> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut core_generation = vec![0u64; engine.num_cores()];
    let mut core_occupant: Vec<Option<JobId>> = vec![None; engine.num_cores()];
    let mut remaining: HashMap<JobId, Time> = HashMap::new();
    let mut running_since: HashMap<JobId, Time> = HashMap::new();

    for job in &scenario {
        seq += 1;
        heap.push(Reverse(ScheduledEvent {
            time: job.arrival_time,
            seq,
            kind: EventKind::Arrival { job_id: job.job_id, running_time: job.running_time, priority: job.priority },
        }));
    }

    /// Records that `job_id` just started (or resumed) running on `core_id`
    /// at `t`, charges any job it displaced for the time it actually ran,
    /// and schedules that core's next quantum-expiry or completion event.
    fn on_dispatch(
        heap: &mut BinaryHeap<Reverse<ScheduledEvent>>,
        core_generation: &mut [u64],
        core_occupant: &mut [Option<JobId>],
        remaining: &mut HashMap<JobId, Time>,
        running_since: &mut HashMap<JobId, Time>,
        seq: &mut u64,
        quantum: Option<Time>,
        core_id: usize,
        job_id: JobId,
        t: Time,
    ) {
        if let Some(victim_id) = core_occupant[core_id] {
            if victim_id != job_id {
                let victim_elapsed = t - running_since.remove(&victim_id).expect("a running job has a start time");
                *remaining.get_mut(&victim_id).expect("a running job has a remaining-time entry") -= victim_elapsed;
            }
        }
        core_occupant[core_id] = Some(job_id);
        running_since.insert(job_id, t);

        core_generation[core_id] += 1;
        let time_left = remaining[&job_id];
        let (delay, kind) = match quantum {
            Some(q) if time_left > q => (q, TimeoutKind::QuantumExpiry),
            _ => (time_left, TimeoutKind::Completion),
        };
        *seq += 1;
        heap.push(Reverse(ScheduledEvent {
            time: t + delay,
            seq: *seq,
            kind: EventKind::CoreTimeout { core_id, job_id, generation: core_generation[core_id], kind },
        }));
    }

    while let Some(Reverse(event)) = heap.pop() {
        match event.kind {
            EventKind::Arrival { job_id, running_time, priority } => {
                info!(job_id, t = event.time, "arrival");
                remaining.insert(job_id, running_time);
                if let Some(core) = engine.new_job(job_id, event.time, running_time, priority) {
                    on_dispatch(
                        &mut heap,
                        &mut core_generation,
                        &mut core_occupant,
                        &mut remaining,
                        &mut running_since,
                        &mut seq,
                        quantum,
                        core,
                        job_id,
                        event.time,
                    );
                }
            }
            EventKind::CoreTimeout { core_id, job_id, generation, kind } => {
                if core_generation[core_id] != generation {
                    // This core was reassigned by a preemption since this event was
                    // scheduled; the event it would have fired for no longer applies.
                    continue;
                }
                let elapsed = event.time - running_since.remove(&job_id).expect("a running job has a start time");
                *remaining.get_mut(&job_id).expect("a running job has a remaining-time entry") -= elapsed;
                core_occupant[core_id] = None;

                let successor = match kind {
                    TimeoutKind::Completion => {
                        info!(job_id, core_id, t = event.time, "completion");
                        remaining.remove(&job_id);
                        engine.job_finished(core_id, job_id, event.time)
                    }
                    TimeoutKind::QuantumExpiry => {
                        info!(job_id, core_id, t = event.time, "quantum expired");
                        engine.quantum_expired(core_id, event.time)
                    }
                };
                if let Some(successor_id) = successor {
                    on_dispatch(
                        &mut heap,
                        &mut core_generation,
                        &mut core_occupant,
                        &mut remaining,
                        &mut running_since,
                        &mut seq,
                        quantum,
                        core_id,
                        successor_id,
                        event.time,
                    );
                }
            }
        }
    }
}

fn try_main() -> Result<(), core_sched_sim::ScenarioError> {
    let args = Args::parse();
    let scheme = parse_scheme(&args.scheme)?;
    if args.num_cores == 0 {
        return Err(core_sched_sim::ScenarioError::NonPositiveCoreCount(0));
    }
    if scheme == Scheme::Rr && args.quantum.is_none() {
        return Err(core_sched_sim::ScenarioError::MissingQuantum);
    }

    let scenario = parse_scenario(&args.scenario_file)?;
    info!(jobs = scenario.len(), cores = args.num_cores, scheme = args.scheme.as_str(), "starting simulation");

    let mut engine = Engine::start_up(args.num_cores, scheme);
    let quantum = if scheme == Scheme::Rr { args.quantum } else { None };
    run_simulation(&mut engine, scenario, quantum);

    println!("average waiting time:    {:.3}", engine.average_waiting_time());
    println!("average turnaround time: {:.3}", engine.average_turnaround_time());
    println!("average response time:   {:.3}", engine.average_response_time());

    engine.clean_up();
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!(error = %err, "simulation aborted");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
