//! The global-EDF discrete-event simulator.
//!
//! Advances time event by event rather than tick by tick: deadline check,
//! priority rebuild, allocation, jump to the next event, execute, repeat.
//! Schedulability can never fail domain-wise once construction has
//! validated its inputs, so `run` returns a plain `bool` verdict rather
//! than a `Result`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::model::{JobPriority, Task};
use crate::processor::Processor;

pub struct Scheduler<'a> {
    tasks: &'a [Task],
    jobs: Vec<crate::model::Job>,
    processors: Vec<Processor>,
    now: u64,
    hyperperiod: u64,
    /// Priority container over released-and-unfinished jobs, rebuilt from
    /// scratch every tick by [`Self::priority_tick`]. Jobs currently
    /// assigned to a processor are re-inserted here too (after
    /// `allocation_tick` detaches everyone), which is what makes
    /// preemption and migration fall out of the allocation step for free.
    heap: BinaryHeap<JobPriority>,
}

impl<'a> Scheduler<'a> {
    /// Builds a fresh scheduler for `tasks` on `processors`. Processors are
    /// sorted by speed descending (stable, so ties keep their relative
    /// input order) the moment the scheduler takes ownership of them.
    pub fn new(tasks: &'a [Task], mut processors: Vec<Processor>) -> Self {
        processors.sort_by_key(|p| Reverse(p.speed));

        let jobs = tasks.iter().map(Task::spawn_initial_job).collect();
        let hyperperiod = tasks
            .iter()
            .map(|t| t.period)
            .fold(1u64, |lcm, period| num::integer::lcm(lcm, period));

        Self { tasks, jobs, processors, now: 0, hyperperiod, heap: BinaryHeap::new() }
    }

    /// The least common multiple of every task's period; the simulation
    /// horizon in the absence of truncation.
    pub fn hyperperiod(&self) -> u64 {
        self.hyperperiod
    }

    /// Runs the simulation to the hyperperiod (or to `truncated_lcm` when
    /// that is set and smaller), returning whether every task met every
    /// deadline it released in that interval.
    ///
    /// `record_history` gates whether processors accumulate
    /// `(task_id, instance_id, start, duration)` tuples for Gantt-style
    /// diagnostics; leave it off for the millions of subset simulations
    /// the search engine runs.
    pub fn run(&mut self, truncated_lcm: Option<u64>, record_history: bool) -> bool {
        if self.tasks.is_empty() {
            tracing::warn!("run() called with an empty task set; treating as unschedulable");
            return false;
        }
        if self.processors.is_empty() {
            tracing::error!("run() called with no processors");
            return false;
        }

        let horizon = match truncated_lcm {
            Some(t) if t > 0 => self.hyperperiod.min(t),
            _ => self.hyperperiod,
        };

        self.now = 0;
        while self.now <= horizon {
            if self.any_deadline_missed() {
                return false;
            }

            self.priority_tick();
            self.allocation_tick();

            let next = self.next_event_time();
            let Some(delta) = next.checked_sub(self.now).filter(|d| *d > 0) else {
                tracing::error!(
                    now = self.now,
                    next,
                    "simulation step was non-positive; aborting conservatively"
                );
                return false;
            };

            self.execute_all(delta, record_history);
            self.now += delta;
        }

        // The last scheduling event can land beyond the horizon; a miss in
        // the interval (last_event, horizon] would otherwise go unseen.
        !self.any_deadline_missed()
    }

    /// Flattens every processor's execution history into
    /// `(processor_id, task_id, instance_id, start, duration)` tuples,
    /// processor by processor, in recorded order.
    pub fn history(&self) -> impl Iterator<Item = (&str, usize, u64, u64, u64)> {
        self.processors.iter().flat_map(|p| {
            p.history
                .iter()
                .map(move |&(task_id, instance_id, start, duration)| {
                    (p.id.as_str(), task_id, instance_id, start, duration)
                })
        })
    }

    fn any_deadline_missed(&self) -> bool {
        self.jobs
            .iter()
            .any(|job| self.now >= job.abs_deadline && job.remaining_time > 0)
    }

    fn priority_tick(&mut self) {
        self.heap.clear();
        for (slot, job) in self.jobs.iter().enumerate() {
            if job.arrival_timepoint <= self.now && job.remaining_time > 0 {
                let task_id = self.tasks[slot].task_id;
                self.heap.push(JobPriority::new(job, task_id, slot));
            }
        }
    }

    fn allocation_tick(&mut self) {
        for processor in &mut self.processors {
            processor.detach();
        }

        for processor in &mut self.processors {
            if let Some(priority) = self.heap.pop() {
                let remaining = self.jobs[priority.slot].remaining_time.max(0) as u64;
                processor.assign(priority.slot, remaining, self.now);
            } else {
                break;
            }
        }
    }

    fn next_event_time(&self) -> u64 {
        let busy_ends = self.processors.iter().filter_map(|p| p.end_timepoint);
        let arrivals = self
            .jobs
            .iter()
            .filter(|job| job.arrival_timepoint > self.now)
            .map(|job| job.arrival_timepoint);

        busy_ends.chain(arrivals).min().unwrap_or(self.now)
    }

    fn execute_all(&mut self, delta: u64, record_history: bool) {
        for processor in &mut self.processors {
            let Some(slot) = processor.current_job else { continue };

            let task = &self.tasks[slot];
            let job = &mut self.jobs[slot];
            let instance_id = job.instance_id;

            job.remaining_time -= (processor.speed * delta) as i64;

            if record_history {
                processor.record_execution(task.task_id, instance_id, self.now, delta);
            }

            if job.is_complete() {
                tracing::debug!(
                    task_id = task.task_id,
                    instance_id,
                    at = self.now + delta,
                    "job completed"
                );
                job.renew(task);
                processor.detach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn platform(speeds: &[u64]) -> Vec<Processor> {
        speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| Processor::new(format!("P{i}"), speed))
            .collect()
    }

    // Single uniprocessor, two tasks, known schedulable. The
    // hyperperiod carries 135 units of work into 150 available ticks.
    #[test]
    fn uniprocessor_two_tasks_is_schedulable() {
        let tasks = vec![
            Task::new(0, 25, 50, 50).unwrap(),
            Task::new(1, 30, 75, 75).unwrap(),
        ];
        let mut scheduler = Scheduler::new(&tasks, platform(&[1]));
        assert!(scheduler.run(None, false));
    }

    // Four identical uniprocessors, five tasks of (6,10,10)
    // each; total utilization 3.0 <= 4 processors, max per-task util <= 1.
    #[test]
    fn four_uniprocessors_five_identical_tasks_is_schedulable() {
        let tasks: Vec<Task> = (0..5).map(|i| Task::new(i, 6, 10, 10).unwrap()).collect();
        let mut scheduler = Scheduler::new(&tasks, platform(&[1, 1, 1, 1]));
        assert!(scheduler.run(None, false));
    }

    // Overload — one processor, three tasks of (5,10,10) each.
    // U = 1.5 > 1, necessarily infeasible.
    #[test]
    fn overloaded_uniprocessor_is_unschedulable() {
        let tasks: Vec<Task> = (0..3).map(|i| Task::new(i, 5, 10, 10).unwrap()).collect();
        let mut scheduler = Scheduler::new(&tasks, platform(&[1]));
        assert!(!scheduler.run(None, false));
    }

    // Ceiling guard — remaining=1 on speed=3 completes after
    // exactly one tick, not zero (which would hang the loop).
    #[test]
    fn ceiling_guard_completes_in_one_tick() {
        let tasks = vec![Task::new(0, 1, 10, 10).unwrap()];
        let mut scheduler = Scheduler::new(&tasks, platform(&[3]));
        assert!(scheduler.run(None, true));
    }

    #[test]
    fn empty_task_set_is_unschedulable() {
        let tasks: Vec<Task> = vec![];
        let mut scheduler = Scheduler::new(&tasks, platform(&[1]));
        assert!(!scheduler.run(None, false));
    }

    #[test]
    fn missing_platform_is_unschedulable() {
        let tasks = vec![Task::new(0, 1, 10, 10).unwrap()];
        let mut scheduler = Scheduler::new(&tasks, vec![]);
        assert!(!scheduler.run(None, false));
    }

    #[test]
    fn truncation_shortens_the_horizon() {
        // Two tasks whose hyperperiod is 150; truncating to 10 only
        // observes the first instance of each, which trivially meets its
        // deadline.
        let tasks = vec![
            Task::new(0, 25, 50, 50).unwrap(),
            Task::new(1, 30, 75, 75).unwrap(),
        ];
        let mut scheduler = Scheduler::new(&tasks, platform(&[1]));
        assert_eq!(scheduler.hyperperiod(), 150);
        assert!(scheduler.run(Some(10), false));
    }

    #[test]
    fn migration_moves_jobs_across_processors_on_preemption() {
        // Two heterogeneous processors, two tasks with a common deadline:
        // the faster processor should always pick up whichever job is
        // closer to missing.
        let tasks = vec![
            Task::new(0, 4, 8, 8).unwrap(),
            Task::new(1, 4, 8, 8).unwrap(),
        ];
        let mut scheduler = Scheduler::new(&tasks, platform(&[2, 1]));
        assert!(scheduler.run(None, false));
    }
}
