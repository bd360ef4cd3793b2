//! Randomized stress test in the teacher's style of exercising a subsystem
//! with `rand`-backed generation (see the teacher's
//! `solver/skip_distribution.rs`) rather than `proptest`'s shrinking
//! strategies: a handful of larger, denser random scenarios run end to end
//! to catch anything the smaller `proptest` cases in `tests/properties.rs`
//! don't happen to generate.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;

use core_sched_sim::engine::Scheme;
use core_sched_sim::job::{JobId, Time};
use core_sched_sim::Engine;

struct Event {
    time: Time,
    seq: u64,
    job_id: JobId,
    completion_core: Option<usize>,
    arrival: Option<(Time, i64)>,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        (self.time, self.seq) == (other.time, other.seq)
    }
}
impl Eq for Event {}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

fn random_scenario(rng: &mut impl Rng, job_count: usize) -> Vec<(JobId, Time, Time, i64)> {
    let mut jobs = Vec::with_capacity(job_count);
    let mut t: Time = 0;
    for job_id in 0..job_count {
        t += rng.random_range(0..4);
        let running_time = rng.random_range(1..20);
        let priority = rng.random_range(0..5);
        jobs.push((job_id as JobId, t, running_time, priority));
    }
    jobs
}

fn run_to_completion(engine: &mut Engine, jobs: Vec<(JobId, Time, Time, i64)>) {
    let mut heap: BinaryHeap<Reverse<Event>> = BinaryHeap::new();
    let mut seq = 0u64;
    for (job_id, arrival_time, running_time, priority) in jobs {
        seq += 1;
        heap.push(Reverse(Event { time: arrival_time, seq, job_id, completion_core: None, arrival: Some((running_time, priority)) }));
    }

    while let Some(Reverse(event)) = heap.pop() {
        if let Some((running_time, priority)) = event.arrival {
            if let Some(core_id) = engine.new_job(event.job_id, event.time, running_time, priority) {
                seq += 1;
                let finish = event.time + engine.remaining_run_time(event.job_id);
                heap.push(Reverse(Event { time: finish, seq, job_id: event.job_id, completion_core: Some(core_id), arrival: None }));
            }
        } else if let Some(core_id) = event.completion_core {
            if let Some(successor_id) = engine.job_finished(core_id, event.job_id, event.time) {
                seq += 1;
                let finish = event.time + engine.remaining_run_time(successor_id);
                heap.push(Reverse(Event { time: finish, seq, job_id: successor_id, completion_core: Some(core_id), arrival: None }));
            }
        }
    }
}

#[test]
fn random_fcfs_scenarios_never_deadlock_and_conserve_time() {
    let mut rng = rand::rng();
    for num_cores in 1..=4u32 {
        for _ in 0..20 {
            let job_count = rng.random_range(5..60);
            let jobs = random_scenario(&mut rng, job_count);
            let total_run_time: f64 = jobs.iter().map(|&(_, _, rt, _)| rt as f64).sum();

            let mut engine = Engine::start_up(num_cores, Scheme::Fcfs);
            run_to_completion(&mut engine, jobs);

            let n = job_count as f64;
            let sum_waiting = engine.average_waiting_time() * n;
            let sum_turnaround = engine.average_turnaround_time() * n;
            let sum_response = engine.average_response_time() * n;

            assert!(sum_turnaround + 1e-6 >= sum_waiting + total_run_time);
            assert!(sum_response <= sum_waiting + 1e-6);
        }
    }
}

#[test]
fn random_sjf_scenarios_never_deadlock_and_conserve_time() {
    let mut rng = rand::rng();
    for num_cores in 1..=4u32 {
        for _ in 0..20 {
            let job_count = rng.random_range(5..60);
            let jobs = random_scenario(&mut rng, job_count);
            let total_run_time: f64 = jobs.iter().map(|&(_, _, rt, _)| rt as f64).sum();

            let mut engine = Engine::start_up(num_cores, Scheme::Sjf);
            run_to_completion(&mut engine, jobs);

            let n = job_count as f64;
            let sum_waiting = engine.average_waiting_time() * n;
            let sum_turnaround = engine.average_turnaround_time() * n;
            let sum_response = engine.average_response_time() * n;

            assert!(sum_turnaround + 1e-6 >= sum_waiting + total_run_time);
            assert!(sum_response <= sum_waiting + 1e-6);
        }
    }
}
