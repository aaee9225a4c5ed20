//! Random platform and task-set generation.
//!
//! Mirrors `original_source/data_generater.py`'s `DataGenerator`: processor
//! speeds and task execution times/periods are drawn uniformly from small
//! integer ranges, deadlines default to implicit (`d = T`) unless the
//! caller asks for constrained deadlines, and tasks with utilization above
//! 1 are rejected and redrawn since a single task that can't meet its own
//! deadline has no business in a training set about combinations of tasks.

use rand::Rng;

use crate::model::Task;
use crate::processor::Processor;

const SPEED_RANGE: std::ops::Range<u64> = 1..10;
const WORK_RANGE: std::ops::Range<u64> = 1..50;

/// Draws `num_processors` processors with speeds uniform in `1..10`,
/// sorted by speed descending.
pub fn generate_platform(num_processors: usize, rng: &mut impl Rng) -> Vec<Processor> {
    let mut processors: Vec<Processor> = (0..num_processors)
        .map(|i| {
            let speed = rng.gen_range(SPEED_RANGE);
            Processor::new(format!("P{i}"), speed)
        })
        .collect();

    processors.sort_by(|a, b| b.speed.cmp(&a.speed));
    processors
}

/// Draws `num_tasks` tasks with `e` and `period` uniform in `1..50`. When
/// `implicit_deadline` is set, `d = period`; otherwise `d` is drawn
/// uniformly in `1..=period`. Tasks with utilization `e / period > 1` are
/// discarded and redrawn: `u <= 1` is a precondition for admission to the
/// search engine, and a task that cannot meet its own deadline running
/// alone is not useful training data.
///
/// Returned tasks are re-sorted by ascending utilization and re-numbered
/// `0..num_tasks` in that order, so `task_id` always reflects relative
/// load within the generated set.
pub fn generate_tasks(num_tasks: usize, implicit_deadline: bool, rng: &mut impl Rng) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(num_tasks);

    while tasks.len() < num_tasks {
        let e = rng.gen_range(WORK_RANGE);
        let period = rng.gen_range(WORK_RANGE);
        let d = if implicit_deadline { period } else { rng.gen_range(1..=period) };

        if e > period {
            continue;
        }

        if let Ok(task) = Task::new(tasks.len(), e, d, period) {
            tasks.push(task);
        }
    }

    tasks.sort_by(|a, b| a.utilization().partial_cmp(&b.utilization()).unwrap());
    for (new_id, task) in tasks.iter_mut().enumerate() {
        task.task_id = new_id;
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generate_platform_has_requested_size_and_is_sorted_descending() {
        let mut rng = StdRng::seed_from_u64(42);
        let processors = generate_platform(5, &mut rng);
        assert_eq!(processors.len(), 5);
        assert!(processors.windows(2).all(|w| w[0].speed >= w[1].speed));
        assert!(processors.iter().all(|p| (1..10).contains(&p.speed)));
    }

    #[test]
    fn generate_tasks_has_requested_size_and_valid_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let tasks = generate_tasks(20, true, &mut rng);
        assert_eq!(tasks.len(), 20);
        for task in &tasks {
            assert!(task.e >= 1 && task.e < 50);
            assert!(task.period >= 1 && task.period < 50);
            assert_eq!(task.d, task.period);
            assert!(task.utilization() <= 1.0);
        }
    }

    #[test]
    fn generate_tasks_is_sorted_by_ascending_utilization_and_renumbered() {
        let mut rng = StdRng::seed_from_u64(99);
        let tasks = generate_tasks(15, false, &mut rng);
        assert!(tasks.windows(2).all(|w| w[0].utilization() <= w[1].utilization()));
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.task_id, i);
        }
    }

    #[test]
    fn same_seed_produces_identical_task_sets() {
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let a = generate_tasks(10, true, &mut rng_a);
        let b = generate_tasks(10, true, &mut rng_b);
        assert_eq!(a, b);
    }
}
