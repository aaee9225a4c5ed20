//! Processor model.
//!
//! An identifier, an integer speed, the currently assigned job (if any),
//! and an optional execution history for Gantt-style diagnostics. The
//! remaining-time arithmetic and completion handling live on
//! [`crate::scheduler::Scheduler`], which owns the `Task`/`Job` tables a
//! `Processor` does not hold a reference to.

/// One entry of a processor's execution history: the task and instance
/// that ran, the tick it started at, and for how long.
pub type HistoryRecord = (usize, u64, u64, u64);

#[derive(Debug, Clone)]
pub struct Processor {
    pub id: String,
    pub speed: u64,
    /// Index into the scheduler's parallel `tasks`/`jobs` vectors, or
    /// `None` when idle.
    pub current_job: Option<usize>,
    pub end_timepoint: Option<u64>,
    pub history: Vec<HistoryRecord>,
}

impl Processor {
    pub fn new(id: impl Into<String>, speed: u64) -> Self {
        Self {
            id: id.into(),
            speed,
            current_job: None,
            end_timepoint: None,
            history: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current_job.is_none()
    }

    /// Assigns `job_slot` (whose current remaining work is `remaining`) to
    /// this processor at time `now`.
    ///
    /// Critical invariant: `end_timepoint` uses integer *ceiling* division.
    /// Flooring would yield `end_timepoint == now` whenever
    /// `remaining < speed`, producing a zero-length step and an infinite
    /// loop in the scheduler's main loop.
    pub fn assign(&mut self, job_slot: usize, remaining: u64, now: u64) {
        debug_assert!(remaining > 0, "assign() called with no remaining work");

        let ticks = remaining.div_ceil(self.speed);
        self.current_job = Some(job_slot);
        self.end_timepoint = Some(now + ticks);
    }

    pub fn detach(&mut self) {
        self.current_job = None;
        self.end_timepoint = None;
    }

    /// Records `duration` ticks of execution of the given job in this
    /// processor's history. Pure bookkeeping: the remaining-time
    /// arithmetic happens in the scheduler, which is the only place that
    /// holds both the job and its task's period for renewal.
    pub fn record_execution(&mut self, task_id: usize, instance_id: u64, now: u64, duration: u64) {
        debug_assert!(duration > 0, "execute() called with a non-positive duration");
        self.history.push((task_id, instance_id, now, duration));
    }
}
