//! The scheduling engine: owns the job records, the core array, and the
//! ordered job store, and implements the three event handlers plus the
//! three metric queries described in the design.
//!
//! Grounded on the original `libscheduler.c`'s six-scheme dispatch logic
//! (with the bugs noted in the design's open questions fixed) and on the
//! teacher crate's `solver` module's style of a struct owning a store plus
//! auxiliary bookkeeping, driven one event at a time.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::comparator::Comparator;
use crate::job::{Job, JobId, Priority, Time};
use crate::store::OrderedJobStore;

/// The six supported scheduling disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// First-come, first-served. Non-preemptive, ordered by arrival.
    Fcfs,
    /// Shortest job first. Non-preemptive, ordered by remaining run time.
    Sjf,
    /// Preemptive shortest job first.
    Psjf,
    /// Priority. Non-preemptive, ordered by priority (lower is more urgent).
    Pri,
    /// Preemptive priority.
    Ppri,
    /// Round-robin. Non-preemptive between quantum expirations, ordered by arrival.
    Rr,
}

impl Scheme {
    fn comparator(self) -> Comparator {
        match self {
            Scheme::Fcfs | Scheme::Rr => Comparator::Arrival,
            Scheme::Sjf | Scheme::Psjf => Comparator::ShortestRemaining,
            Scheme::Pri | Scheme::Ppri => Comparator::Priority,
        }
    }

    fn is_preemptive(self) -> bool {
        matches!(self, Scheme::Psjf | Scheme::Ppri)
    }
}

/// Owns everything the simulator needs to answer one run: the job records,
/// the core array, the ordered store, and the running accumulators. The host
/// constructs one `Engine` per simulation; there is no shared global state.
#[derive(Debug)]
pub struct Engine {
    scheme: Scheme,
    cores: Vec<bool>,
    jobs: HashMap<JobId, Job>,
    store: OrderedJobStore,
    num_jobs_ever: u64,
    sum_waiting: f64,
    sum_turnaround: f64,
    sum_response: f64,
    last_tick: Time,
}

impl Engine {
    /// Initializes counters to zero, allocates `num_cores` idle slots, and
    /// selects the comparator implied by `scheme`.
    pub fn start_up(num_cores: u32, scheme: Scheme) -> Self {
        assert!(num_cores > 0, "a scheduler needs at least one core");
        Engine {
            scheme,
            cores: vec![false; num_cores as usize],
            jobs: HashMap::new(),
            store: OrderedJobStore::new(scheme.comparator()),
            num_jobs_ever: 0,
            sum_waiting: 0.0,
            sum_turnaround: 0.0,
            sum_response: 0.0,
            last_tick: 0,
        }
    }

    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    /// The current remaining run time of a job still known to the engine.
    /// Only kept live across ticks for jobs the active scheme actually
    /// orders by remaining time (`PSJF`'s arrival-time catch-up); callers
    /// driving real wall-clock-style scheduling decisions for other schemes
    /// must track elapsed execution themselves rather than relying on this
    /// field staying current.
    pub fn remaining_run_time(&self, job_id: JobId) -> Time {
        self.jobs[&job_id].remaining_run_time()
    }

    /// Handles the arrival of a new job. Returns the core it was dispatched
    /// to, if any changed.
    pub fn new_job(&mut self, job_id: JobId, t: Time, running_time: Time, priority: Priority) -> Option<usize> {
        assert!(!self.jobs.contains_key(&job_id), "job {job_id} arrived twice");

        let mut job = Job::new(job_id, t, running_time, priority);
        self.num_jobs_ever += 1;

        if let Some(idle_core) = self.cores.iter().position(|&busy| !busy) {
            self.cores[idle_core] = true;
            job.dispatch_first(idle_core, t);
            self.jobs.insert(job_id, job);
            self.store.offer(job_id, &self.jobs);
            if self.scheme == Scheme::Psjf {
                self.last_tick = t;
            }
            debug!(job_id, core = idle_core, "dispatched new arrival to idle core");
            return Some(idle_core);
        }

        self.jobs.insert(job_id, job);

        let dispatched_core = match self.scheme {
            Scheme::Psjf => self.preempt_for_shortest_remaining(job_id, t, running_time),
            Scheme::Ppri => self.preempt_for_priority(job_id, t, priority),
            Scheme::Fcfs | Scheme::Sjf | Scheme::Pri | Scheme::Rr => None,
        };

        self.store.offer(job_id, &self.jobs);
        dispatched_core
    }

    /// `PSJF` eviction: advances every running job's remaining time to
    /// the current tick, then evicts the running job with the largest
    /// remaining time if the arriving job is strictly shorter.
    fn preempt_for_shortest_remaining(&mut self, job_id: JobId, t: Time, running_time: Time) -> Option<usize> {
        let delta = t - self.last_tick;
        let running: Vec<JobId> = self.running_job_ids();
        for &id in &running {
            let job = self.jobs.get_mut(&id).unwrap();
            if job.start_time() != Some(t) {
                job.advance(delta);
            }
        }

        let mut victim: Option<(JobId, Time)> = None;
        for &id in &running {
            let remaining = self.jobs[&id].remaining_run_time();
            if victim.map(|(_, max)| remaining > max).unwrap_or(true) {
                victim = Some((id, remaining));
            }
        }

        self.last_tick = t;

        let (victim_id, victim_remaining) = victim.expect("a busy engine has a running job on every core");
        if running_time >= victim_remaining {
            trace!(job_id, victim_id, "PSJF: tie or longer, no preemption");
            return None;
        }

        let freed_core = self.evict(victim_id, t);
        self.jobs.get_mut(&job_id).unwrap().dispatch_first(freed_core, t);
        debug!(job_id, victim_id, core = freed_core, "PSJF preempted a longer running job");
        Some(freed_core)
    }

    /// `PPRI` eviction: evicts the running job with the numerically highest
    /// priority value (the least urgent) if the arriving job is strictly
    /// more urgent.
    fn preempt_for_priority(&mut self, job_id: JobId, t: Time, priority: Priority) -> Option<usize> {
        let running = self.running_job_ids();
        let mut victim: Option<(JobId, Priority)> = None;
        for &id in &running {
            let candidate_priority = self.jobs[&id].priority();
            if victim.map(|(_, max)| candidate_priority > max).unwrap_or(true) {
                victim = Some((id, candidate_priority));
            }
        }
        let (victim_id, victim_priority) = victim.expect("a busy engine has a running job on every core");

        if priority >= victim_priority {
            trace!(job_id, victim_id, "PPRI: not more urgent, no preemption");
            return None;
        }

        let freed_core = self.evict(victim_id, t);
        self.jobs.get_mut(&job_id).unwrap().dispatch_first(freed_core, t);
        debug!(job_id, victim_id, core = freed_core, "PPRI preempted a less urgent running job");
        Some(freed_core)
    }

    /// Evicts the job currently on whatever core it occupies, rolling back
    /// its response-time credit if it was dispatched on this very tick, or
    /// marking the current tick as its new suspension point otherwise.
    /// Returns the core that was freed.
    fn evict(&mut self, victim_id: JobId, t: Time) -> usize {
        let victim = self.jobs.get_mut(&victim_id).unwrap();
        let freed_core = victim.assigned_core().expect("victim must be running");
        if victim.first_start_time() == Some(t) {
            self.sum_response -= (t - victim.arrival_time()) as f64;
            victim.rollback_dispatch();
        } else {
            victim.suspend_for_wait(t);
        }
        freed_core
    }

    fn running_job_ids(&self) -> Vec<JobId> {
        self.jobs.values().filter(|job| job.is_running()).map(Job::job_id).collect()
    }

    /// Handles the completion of the job on `core_id`. Returns the job that
    /// was dispatched to take its place, if any.
    pub fn job_finished(&mut self, core_id: usize, job_id: JobId, t: Time) -> Option<JobId> {
        let job = self.jobs.get(&job_id).unwrap_or_else(|| panic!("job {job_id} is not known to the engine"));
        assert_eq!(job.assigned_core(), Some(core_id), "job {job_id} is not running on core {core_id}");

        self.sum_turnaround += (t - job.arrival_time()) as f64;
        self.store.remove(job_id);
        self.jobs.remove(&job_id);
        self.cores[core_id] = false;
        debug!(job_id, core_id, "job finished");

        self.dispatch_next_waiting_job(core_id, t)
    }

    /// Handles a quantum expiration on `core_id`. Only meaningful under
    /// `RR`. Returns the job dispatched to take the freed core, if any.
    pub fn quantum_expired(&mut self, core_id: usize, t: Time) -> Option<JobId> {
        assert_eq!(self.scheme, Scheme::Rr, "quantum expiry only applies to round-robin scheduling");

        let job_id = self
            .jobs
            .values()
            .find(|job| job.assigned_core() == Some(core_id))
            .map(Job::job_id)
            .unwrap_or_else(|| panic!("no job is running on core {core_id}"));

        self.store.remove(job_id);
        self.jobs.get_mut(&job_id).unwrap().suspend_for_wait(t);
        self.cores[core_id] = false;
        self.store.offer(job_id, &self.jobs);
        trace!(job_id, core_id, "quantum expired, job requeued to the tail");

        self.dispatch_next_waiting_job(core_id, t)
    }

    /// Scans the store in order for the first job without a core and
    /// dispatches it to `core_id`, crediting response or waiting time as
    /// appropriate. A single forward scan per call; never carries an index
    /// across calls or across outer iterations.
    fn dispatch_next_waiting_job(&mut self, core_id: usize, t: Time) -> Option<JobId> {
        let mut successor = None;
        for position in 0..self.store.size() {
            let candidate = self.store.at(position).expect("position within bounds");
            if self.jobs[&candidate].assigned_core().is_none() {
                successor = Some(candidate);
                break;
            }
        }

        let successor_id = successor?;
        let job = self.jobs.get_mut(&successor_id).unwrap();
        if job.first_start_time().is_none() {
            let credit = (t - job.arrival_time()) as f64;
            self.sum_waiting += credit;
            self.sum_response += credit;
            job.dispatch_first(core_id, t);
        } else {
            let resumed_from = job.start_time().expect("a pre-empted job retains its suspension time");
            self.sum_waiting += (t - resumed_from) as f64;
            job.resume(core_id, t);
        }
        self.cores[core_id] = true;
        debug!(job_id = successor_id, core_id, "dispatched next waiting job");
        Some(successor_id)
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.sum_waiting / self.num_jobs_ever as f64
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.sum_turnaround / self.num_jobs_ever as f64
    }

    pub fn average_response_time(&self) -> f64 {
        self.sum_response / self.num_jobs_ever as f64
    }

    /// Emits the current ordered queue as `job_id(core_id) ...`, with `-1`
    /// standing in for a job that is not currently assigned to any core.
    pub fn show_queue(&self) -> String {
        self.store
            .iter()
            .map(|job_id| {
                let core = self.jobs[&job_id]
                    .assigned_core()
                    .map(|c| c as i64)
                    .unwrap_or(-1);
                format!("{job_id}({core})")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Consumes the engine, releasing its internal resources.
    pub fn clean_up(self) {}

    #[cfg(test)]
    fn scheme(&self) -> Scheme {
        self.scheme
    }

    #[cfg(test)]
    fn is_core_busy(&self, core_id: usize) -> bool {
        self.cores[core_id]
    }

    #[cfg(test)]
    fn job(&self, job_id: JobId) -> &Job {
        &self.jobs[&job_id]
    }
}
