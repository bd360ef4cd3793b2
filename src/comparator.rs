//! The comparator kinds used to keep the [`crate::store::OrderedJobStore`]
//! sorted. Kept as a tagged enum rather than a boxed closure or a shared
//! mutable global, per the design note against process-wide comparator state.

use std::cmp::Ordering;

use crate::job::Job;

/// Which field the store is currently sorted by. `FCFS` and `RR` both use
/// `Arrival`; `SJF`/`PSJF` use `ShortestRemaining`; `PRI`/`PPRI` use `Priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Arrival,
    ShortestRemaining,
    Priority,
}

impl Comparator {
    /// Compares two jobs under this comparator. `ShortestRemaining` and
    /// `Priority` break ties by `arrival_time` ascending. `Arrival` ignores
    /// both jobs' contents entirely and always reports `a` as coming after
    /// `b`: new arrivals always append to the tail, which is what makes this
    /// comparator double as FIFO insertion order *and* as the "send back to
    /// the tail" behaviour `RR` needs when it re-queues a pre-empted job
    /// whose original `arrival_time` no longer reflects its queue position.
    /// A comparator that instead keyed off `arrival_time` directly would
    /// send a re-queued job back toward the head instead of the tail.
    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            Comparator::Arrival => Ordering::Greater,
            Comparator::ShortestRemaining => a
                .remaining_run_time()
                .cmp(&b.remaining_run_time())
                .then_with(|| a.arrival_time().cmp(&b.arrival_time())),
            Comparator::Priority => a
                .priority()
                .cmp(&b.priority())
                .then_with(|| a.arrival_time().cmp(&b.arrival_time())),
        }
    }
}
