//! The ordered job store: a sequence of job ids kept sorted by a
//! [`Comparator`], supporting the `offer`/`peek`/`poll`/`at`/`remove_at`/
//! `remove`/`size` contract. This is the only container the engine consults
//! to decide what runs next.
//!
//! Grounded on the `offer`/`peek`/`poll`/`at`/`remove`/`remove_at`/`size`
//! contract of the original `libpriqueue`, and on the order-then-scan idiom
//! the teacher crate uses for its own job orderings.

use std::collections::HashMap;

use crate::comparator::Comparator;
use crate::job::{Job, JobId};

/// A sequence of job ids, always kept sorted by `comparator`. Jobs are
/// looked up by id in a caller-supplied map whenever a comparison is needed;
/// the store itself holds no job data, only ids, so a mutation of a job's
/// `remaining_run_time` never invalidates anything the store is holding.
#[derive(Debug, Clone)]
pub struct OrderedJobStore {
    comparator: Comparator,
    order: Vec<JobId>,
}

impl OrderedJobStore {
    pub fn new(comparator: Comparator) -> Self {
        OrderedJobStore { comparator, order: Vec::new() }
    }

    /// Inserts `job_id` at the last position `i` such that the element
    /// before it compares `<= 0` and the element at `i` (if any) compares
    /// strictly greater, i.e. ties are broken by appending after equal
    /// elements. Returns the insertion index.
    pub fn offer(&mut self, job_id: JobId, jobs: &HashMap<JobId, Job>) -> usize {
        let incoming = jobs[&job_id];
        let mut index = self.order.len();
        for (i, existing_id) in self.order.iter().enumerate() {
            let existing = jobs[existing_id];
            if self.comparator.compare(&incoming, &existing).is_lt() {
                index = i;
                break;
            }
        }
        self.order.insert(index, job_id);
        index
    }

    /// Returns the head of the store without removing it.
    pub fn peek(&self) -> Option<JobId> {
        self.order.first().copied()
    }

    /// Removes and returns the head of the store.
    pub fn poll(&mut self) -> Option<JobId> {
        if self.order.is_empty() { None } else { Some(self.order.remove(0)) }
    }

    /// Returns the `index`-th element in current order, without mutating.
    pub fn at(&self, index: usize) -> Option<JobId> {
        self.order.get(index).copied()
    }

    /// Removes and returns the `index`-th element, closing the gap.
    pub fn remove_at(&mut self, index: usize) -> Option<JobId> {
        if index < self.order.len() { Some(self.order.remove(index)) } else { None }
    }

    /// Removes every occurrence of `job_id` by identity (not by comparator
    /// equality) and returns how many were removed. A job id that is not
    /// present yields `0` and leaves the store unchanged.
    pub fn remove(&mut self, job_id: JobId) -> usize {
        let before = self.order.len();
        self.order.retain(|&id| id != job_id);
        before - self.order.len()
    }

    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates the store in its current order without mutating it.
    pub fn iter(&self) -> impl Iterator<Item = JobId> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;

    fn map(jobs: Vec<Job>) -> HashMap<JobId, Job> {
        jobs.into_iter().map(|j| (j.job_id(), j)).collect()
    }

    #[test]
    fn test_offer_under_arrival_always_appends_to_tail() {
        // Arrival always reports incoming-after-existing, so the store ends
        // up ordered by insertion order regardless of `arrival_time` values
        // (this is what lets RR re-queue a pre-empted job to the tail).
        let jobs = map(vec![
            Job::new(0, 10, 5, 0),
            Job::new(1, 5, 5, 0),
            Job::new(2, 20, 5, 0),
        ]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        store.offer(2, &jobs);
        assert_eq!(store.at(0), Some(0));
        assert_eq!(store.at(1), Some(1));
        assert_eq!(store.at(2), Some(2));
        assert_eq!(store.size(), 3);
    }

    #[test]
    fn test_requeue_under_arrival_moves_to_tail() {
        let jobs = map(vec![Job::new(0, 0, 5, 0), Job::new(1, 1, 5, 0)]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        store.remove(0);
        store.offer(0, &jobs);
        assert_eq!(store.at(0), Some(1));
        assert_eq!(store.at(1), Some(0));
    }

    #[test]
    fn test_ties_append_after_equal_elements() {
        let jobs = map(vec![
            Job::new(0, 0, 5, 3),
            Job::new(1, 1, 5, 3),
            Job::new(2, 2, 5, 1),
        ]);
        let mut store = OrderedJobStore::new(Comparator::Priority);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        store.offer(2, &jobs);
        // job 2 has the lowest priority value, so it sorts first; 0 and 1
        // are tied on priority and must stay in insertion order.
        assert_eq!(store.at(0), Some(2));
        assert_eq!(store.at(1), Some(0));
        assert_eq!(store.at(2), Some(1));
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let jobs = map(vec![Job::new(0, 0, 5, 0)]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        assert_eq!(store.peek(), Some(0));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_poll_removes_head() {
        let jobs = map(vec![Job::new(0, 0, 5, 0), Job::new(1, 1, 5, 0)]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        assert_eq!(store.poll(), Some(0));
        assert_eq!(store.size(), 1);
        assert_eq!(store.peek(), Some(1));
    }

    #[test]
    fn test_remove_at_closes_gap() {
        let jobs = map(vec![Job::new(0, 0, 5, 0), Job::new(1, 1, 5, 0), Job::new(2, 2, 5, 0)]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        store.offer(2, &jobs);
        assert_eq!(store.remove_at(1), Some(1));
        assert_eq!(store.at(0), Some(0));
        assert_eq!(store.at(1), Some(2));
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn test_remove_by_identity_ignores_comparator_equality() {
        let jobs = map(vec![Job::new(0, 0, 5, 1), Job::new(1, 1, 5, 1), Job::new(2, 2, 5, 9)]);
        let mut store = OrderedJobStore::new(Comparator::Priority);
        store.offer(0, &jobs);
        store.offer(1, &jobs);
        store.offer(2, &jobs);
        assert_eq!(store.remove(1), 1);
        assert_eq!(store.size(), 2);
        assert!(store.iter().all(|id| id != 1));
    }

    #[test]
    fn test_remove_absent_id_is_idempotent() {
        let jobs = map(vec![Job::new(0, 0, 5, 0)]);
        let mut store = OrderedJobStore::new(Comparator::Arrival);
        store.offer(0, &jobs);
        assert_eq!(store.remove(42), 0);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_empty_store_returns_none() {
        let store = OrderedJobStore::new(Comparator::Arrival);
        assert_eq!(store.peek(), None);
        assert_eq!(store.at(0), None);
        assert_eq!(store.size(), 0);
        assert!(store.is_empty());
    }

    use proptest::prelude::*;

    proptest! {
        /// Whatever order a set of jobs is `offer`ed in, `ShortestRemaining`
        /// always leaves the store sorted by remaining run time ascending,
        /// ties broken by arrival time.
        #[test]
        fn ordering_holds_under_shortest_remaining(
            specs in prop::collection::vec((0i64..200, 1i64..100), 1..20),
        ) {
            let jobs: Vec<Job> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (arrival, run))| Job::new(i as JobId, arrival, run, 0))
                .collect();
            let by_id = map(jobs.clone());

            let mut store = OrderedJobStore::new(Comparator::ShortestRemaining);
            for job in &jobs {
                store.offer(job.job_id(), &by_id);
            }

            let ordered: Vec<Job> = store.iter().map(|id| by_id[&id]).collect();
            for window in ordered.windows(2) {
                let (a, b) = (window[0], window[1]);
                prop_assert!(
                    a.remaining_run_time() < b.remaining_run_time()
                        || (a.remaining_run_time() == b.remaining_run_time() && a.arrival_time() <= b.arrival_time())
                );
            }
        }

        /// Removing a job id that was never inserted is a no-op, regardless
        /// of what else is currently in the store.
        #[test]
        fn remove_of_absent_id_is_always_idempotent(
            present_ids in prop::collection::vec(0i64..50, 0..20),
            absent_id in 1000i64..2000,
        ) {
            let jobs: Vec<Job> = present_ids.iter().map(|&id| Job::new(id, id, 1, 0)).collect();
            let by_id = map(jobs.clone());
            let mut store = OrderedJobStore::new(Comparator::Arrival);
            for job in &jobs {
                store.offer(job.job_id(), &by_id);
            }

            let size_before = store.size();
            prop_assert_eq!(store.remove(absent_id), 0);
            prop_assert_eq!(store.size(), size_before);
        }
    }
}
