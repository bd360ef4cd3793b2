//! The job record described by the data model: identity fields that never
//! change after construction, plus the mutable fields the engine updates as
//! a job moves between cores.

/// Virtual time, as supplied by the host simulator. Never read from a real clock.
pub type Time = i64;

/// Globally unique job identifier, assigned by the host.
pub type JobId = i64;

/// Lower value means higher priority.
pub type Priority = i64;

/// A pending or running job together with the bookkeeping fields the engine
/// needs to compute waiting/response/turnaround time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    job_id: JobId,
    arrival_time: Time,
    original_run_time: Time,
    priority: Priority,
    remaining_run_time: Time,
    start_time: Option<Time>,
    first_start_time: Option<Time>,
    assigned_core: Option<usize>,
}

impl Job {
    /// Constructs a freshly-arrived job. It has not been dispatched to a core yet.
    pub fn new(job_id: JobId, arrival_time: Time, running_time: Time, priority: Priority) -> Self {
        assert!(running_time > 0, "job {job_id} has non-positive running time {running_time}");
        Job {
            job_id,
            arrival_time,
            original_run_time: running_time,
            priority,
            remaining_run_time: running_time,
            start_time: None,
            first_start_time: None,
            assigned_core: None,
        }
    }

    pub fn job_id(&self) -> JobId { self.job_id }

    pub fn arrival_time(&self) -> Time { self.arrival_time }

    pub fn original_run_time(&self) -> Time { self.original_run_time }

    pub fn priority(&self) -> Priority { self.priority }

    pub fn remaining_run_time(&self) -> Time { self.remaining_run_time }

    pub fn start_time(&self) -> Option<Time> { self.start_time }

    pub fn first_start_time(&self) -> Option<Time> { self.first_start_time }

    pub fn assigned_core(&self) -> Option<usize> { self.assigned_core }

    pub fn is_running(&self) -> bool { self.assigned_core.is_some() }

    pub fn has_finished(&self) -> bool { self.remaining_run_time == 0 }

    /// Dispatches this job to `core` for the first time. Credits the response
    /// time implicitly by recording `first_start_time`.
    pub fn dispatch_first(&mut self, core: usize, t: Time) {
        debug_assert!(self.first_start_time.is_none(), "job {} dispatched twice", self.job_id);
        self.assigned_core = Some(core);
        self.start_time = Some(t);
        self.first_start_time = Some(t);
    }

    /// Resumes a previously pre-empted job on `core`. Does not touch `first_start_time`.
    pub fn resume(&mut self, core: usize, t: Time) {
        debug_assert!(self.first_start_time.is_some(), "job {} resumed before first dispatch", self.job_id);
        self.assigned_core = Some(core);
        self.start_time = Some(t);
    }

    /// Advances the remaining run time by `delta` (used by `PSJF` to catch up
    /// running jobs to the current virtual time before comparing them).
    pub fn advance(&mut self, delta: Time) {
        self.remaining_run_time -= delta;
        debug_assert!(self.remaining_run_time >= 0, "job {} ran past completion", self.job_id);
    }

    /// Pre-empts (or round-robin re-queues) a running job that had already
    /// credited its response time on an earlier tick: the job is suspended,
    /// keeps its `first_start_time`, and `start_time` is overwritten with
    /// `t`, the instant it re-entered the waiting pool, so that its eventual
    /// resumption can compute the wait interval as `resume_time - t`.
    pub fn suspend_for_wait(&mut self, t: Time) {
        self.assigned_core = None;
        self.start_time = Some(t);
    }

    /// Rolls back a dispatch that happened on the very same tick it is now
    /// being pre-empted on: the job never actually executed, so the response
    /// credit it received must be undone by the caller and `first_start_time`
    /// is un-set so the job's next dispatch is treated as its first.
    pub fn rollback_dispatch(&mut self) {
        self.assigned_core = None;
        self.first_start_time = None;
        self.start_time = None;
    }

    /// Completes the job: reduces `remaining_run_time` to zero and frees its core.
    pub fn complete(&mut self) {
        self.remaining_run_time = 0;
        self.assigned_core = None;
    }
}
