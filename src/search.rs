//! Recursive subset-decomposition search engine.
//!
//! Decides schedulability of task subsets, memoizing verdicts and pruning
//! with a necessary utilization condition and already-known minimal
//! unschedulable combinations, recursing into `|S|-1` children whenever a
//! subset turns out unschedulable to discover new ones.

use std::collections::HashSet;
use std::io;

use crate::model::Task;
use crate::output::OutputSink;
use crate::processor::Processor;
use crate::scheduler::Scheduler;

/// An immutable, sorted, deduplicated set of task ids. Sorting up front
/// buys cheap structural `Hash`/`Eq` and deterministic CSV rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskSet(Vec<usize>);

impl TaskSet {
    pub fn new(mut ids: Vec<usize>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[usize] {
        &self.0
    }

    /// True when every id of `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0.iter().all(|id| other.0.binary_search(id).is_ok())
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    /// The `|S|-1` subsets obtained by removing one element at a time, in
    /// the same order their elements appear in `self`.
    pub fn children(&self) -> impl Iterator<Item = TaskSet> + '_ {
        (0..self.0.len()).map(move |skip| {
            let mut ids = self.0.clone();
            ids.remove(skip);
            TaskSet(ids)
        })
    }
}

/// Configuration knobs the search engine doesn't infer from the task
/// table or platform.
pub struct SearchConfig {
    /// Horizon passed through to every [`Scheduler::run`] call; `None`
    /// simulates the full hyperperiod.
    pub truncated_lcm: Option<u64>,
    /// Whether subsets only proven schedulable up to a truncated horizon
    /// are still appended to `hyperedges.csv`. Defaults to `true`;
    /// memoization always happens regardless of this flag, since it only
    /// gates the output stream.
    pub record_truncated_as_hyperedge: bool,
    /// When set, every simulated subset also records processor execution
    /// history and the engine dumps it through `sink`'s Gantt writer.
    pub record_gantt: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            truncated_lcm: None,
            record_truncated_as_hyperedge: true,
            record_gantt: false,
        }
    }
}

pub struct SearchEngine<'a> {
    tasks: &'a [Task],
    processors: Vec<Processor>,
    /// `sum(speed) / max(speed)`, the denominator of the necessary
    /// utilization condition.
    speed_factor: f64,
    config: SearchConfig,
    positive_set: HashSet<TaskSet>,
    negative_set: HashSet<TaskSet>,
    muc_set: HashSet<TaskSet>,
    /// Whether the most recent call to [`Self::simulate`] ran against a
    /// truncated horizon rather than the full hyperperiod.
    last_simulation_truncated: bool,
    sink: &'a mut OutputSink,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        tasks: &'a [Task],
        processors: Vec<Processor>,
        config: SearchConfig,
        sink: &'a mut OutputSink,
    ) -> Self {
        let speed_max = processors.iter().map(|p| p.speed).max().unwrap_or(1) as f64;
        let speed_sum: f64 = processors.iter().map(|p| p.speed as f64).sum();
        let speed_factor = if speed_max > 0.0 { speed_sum / speed_max } else { 1.0 };

        Self {
            tasks,
            processors,
            speed_factor,
            config,
            positive_set: HashSet::new(),
            negative_set: HashSet::new(),
            muc_set: HashSet::new(),
            last_simulation_truncated: false,
            sink,
        }
    }

    pub fn positive_set(&self) -> &HashSet<TaskSet> {
        &self.positive_set
    }

    pub fn negative_set(&self) -> &HashSet<TaskSet> {
        &self.negative_set
    }

    pub fn muc_set(&self) -> &HashSet<TaskSet> {
        &self.muc_set
    }

    /// Samples `num_samples` uniform-without-replacement subsets of size
    /// `min(max_size, n)` from `{0, .., n-1}` and decides each.
    pub fn generate_hyperedges(
        &mut self,
        max_size: usize,
        num_samples: usize,
        rng: &mut impl rand::Rng,
    ) -> io::Result<()> {
        let n = self.tasks.len();
        if n == 0 {
            return Ok(());
        }
        let k = max_size.min(n);

        for _ in 0..num_samples {
            let ids = rand::seq::index::sample(rng, n, k).into_vec();
            let subset = TaskSet::new(ids);
            self.search(&subset)?;
        }

        Ok(())
    }

    /// Decides schedulability of `subset`, memoizing the verdict and
    /// streaming it (and any minimal unschedulable combination it
    /// uncovers) to the output sink.
    pub fn search(&mut self, subset: &TaskSet) -> io::Result<bool> {
        if subset.is_empty() {
            return Ok(true);
        }
        if self.positive_set.contains(subset) {
            return Ok(true);
        }
        if self.negative_set.contains(subset) {
            return Ok(false);
        }
        if self.positive_set.iter().any(|p| p.is_superset_of(subset)) {
            // Monotonicity: every subset of a schedulable set is
            // schedulable. Deliberately not memoized here, so the
            // positive set stays small and the superset prune keeps
            // doing its job for later, smaller subsets too.
            return Ok(true);
        }

        let muc_hit = self.muc_set.iter().any(|m| m.is_subset_of(subset));
        let utilization = self.utilization_bound(subset);

        let feasible = if !muc_hit && utilization <= 1.0 {
            self.simulate(subset)?
        } else {
            false
        };

        if feasible {
            self.positive_set.insert(subset.clone());
            if self.should_record(subset) {
                self.sink.append_hyperedge(subset)?;
            }
            Ok(true)
        } else {
            self.negative_set.insert(subset.clone());
            self.sink.append_negative(subset)?;

            let mut all_children_feasible = true;
            for child in subset.children() {
                let child_feasible = self.search(&child)?;
                all_children_feasible &= child_feasible;
            }

            if all_children_feasible {
                self.muc_set.insert(subset.clone());
                self.sink.append_muc(subset)?;
            }

            Ok(false)
        }
    }

    fn utilization_bound(&self, subset: &TaskSet) -> f64 {
        let total: f64 = subset
            .ids()
            .iter()
            .map(|&id| self.tasks[id].utilization())
            .sum();
        total / self.speed_factor
    }

    fn simulate(&mut self, subset: &TaskSet) -> io::Result<bool> {
        let selected: Vec<Task> = subset.ids().iter().map(|&id| self.tasks[id]).collect();
        let mut scheduler = Scheduler::new(&selected, self.processors.clone());
        let hyperperiod = scheduler.hyperperiod();
        let truncated = self
            .config
            .truncated_lcm
            .is_some_and(|t| t > 0 && t < hyperperiod);

        let feasible = scheduler.run(self.config.truncated_lcm, self.config.record_gantt);

        if self.config.record_gantt {
            self.sink.write_gantt(subset, &scheduler)?;
        }

        self.last_simulation_truncated = truncated;
        Ok(feasible)
    }

    fn should_record(&self, _subset: &TaskSet) -> bool {
        !self.last_simulation_truncated || self.config.record_truncated_as_hyperedge
    }
}
