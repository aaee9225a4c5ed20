//! Task and Job model.
//!
//! A [`Task`] is the immutable, static description of a periodic task
//! (`e`, `d`, `T`); a [`Job`] is the mutable per-activation state a
//! [`crate::scheduler::Scheduler`] advances tick by tick. Static
//! parameters live on one type, derived quantities are plain methods, and
//! construction validates rather than panics.

use std::cmp::Ordering;

/// Error raised when a [`Task`]'s parameters violate the data-model
/// invariants of `1 <= e`, `1 <= d <= T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    ZeroExecutionTime,
    ZeroPeriod,
    DeadlineOutOfRange { deadline: u64, period: u64 },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroExecutionTime => write!(f, "execution time must be >= 1"),
            Self::ZeroPeriod => write!(f, "period must be >= 1"),
            Self::DeadlineOutOfRange { deadline, period } => write!(
                f,
                "deadline {deadline} must satisfy 1 <= d <= T (T = {period})"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Static parameters of a periodic task, keyed by `task_id`.
///
/// `e` is measured on the reference processor of speed 1; `u = e / T` is
/// the task's normalized utilization at that reference speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub task_id: usize,
    pub e: u64,
    pub d: u64,
    pub period: u64,
}

impl Task {
    /// Constructs a task, validating `1 <= e`, `1 <= d <= period`, `period >= 1`.
    pub fn new(task_id: usize, e: u64, d: u64, period: u64) -> Result<Self, ModelError> {
        if e == 0 {
            return Err(ModelError::ZeroExecutionTime);
        }
        if period == 0 {
            return Err(ModelError::ZeroPeriod);
        }
        if d == 0 || d > period {
            return Err(ModelError::DeadlineOutOfRange { deadline: d, period });
        }

        Ok(Self { task_id, e, d, period })
    }

    /// Normalized utilization at a reference speed of 1.
    pub fn utilization(&self) -> f64 {
        self.e as f64 / self.period as f64
    }

    /// Returns the initial job for this task: released at time zero, full
    /// remaining work, first absolute deadline at `d`.
    pub fn spawn_initial_job(&self) -> Job {
        Job {
            arrival_timepoint: 0,
            instance_id: 0,
            remaining_time: self.e as i64,
            abs_deadline: self.d,
        }
    }
}

/// Mutable per-activation state of a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub arrival_timepoint: u64,
    pub instance_id: u64,
    /// Signed so `Scheduler::execute_all` can drive it transiently below
    /// zero before the completion check runs, without an extra saturating
    /// subtraction on every tick.
    pub remaining_time: i64,
    pub abs_deadline: u64,
}

impl Job {
    /// True once all of this activation's work has been executed.
    pub fn is_complete(&self) -> bool {
        self.remaining_time <= 0
    }

    /// Renews the job to its next periodic activation.
    ///
    /// Precondition: `remaining_time <= 0`. Checked with `debug_assert!`
    /// rather than a runtime error — a violation here is a scheduler bug,
    /// not a data condition callers can recover from.
    pub fn renew(&mut self, task: &Task) {
        debug_assert!(self.remaining_time <= 0, "renew() called on an unfinished job");

        self.arrival_timepoint += task.period;
        self.instance_id += 1;
        self.remaining_time = task.e as i64;
        self.abs_deadline += task.period;
    }

    /// Priority key for the EDF heap: lower deadline first, ties broken by
    /// ascending `task_id` for determinism.
    fn priority_key(&self, task_id: usize) -> (u64, usize) {
        (self.abs_deadline, task_id)
    }
}

/// Min-heap entry pairing a job's priority key with the index of its slot
/// in the scheduler's parallel `tasks`/`jobs` vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPriority {
    pub abs_deadline: u64,
    pub task_id: usize,
    pub slot: usize,
}

impl JobPriority {
    pub fn new(job: &Job, task_id: usize, slot: usize) -> Self {
        let (abs_deadline, task_id) = job.priority_key(task_id);
        Self { abs_deadline, task_id, slot }
    }
}

// `BinaryHeap` is a max-heap; reversing the comparison turns it into the
// min-heap the EDF tie-break (earliest deadline, then smallest task_id)
// requires.
impl Ord for JobPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.abs_deadline, other.task_id).cmp(&(self.abs_deadline, self.task_id))
    }
}

impl PartialOrd for JobPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
