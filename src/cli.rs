//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Generates labeled schedulability training data for periodic task sets
/// on heterogeneous multiprocessor platforms under global EDF.
#[derive(Debug, Parser)]
#[command(name = "edf-hyperedge-gen", version, about)]
pub struct Args {
    /// Seed for every random draw (platform, tasks, subset sampling).
    /// Identical seeds reproduce byte-identical output files.
    #[arg(long)]
    pub seed: u64,

    /// Number of processors to generate. Ignored when `--load-platform`
    /// is given.
    #[arg(long)]
    pub number_of_processors: usize,

    /// Number of tasks to generate.
    #[arg(long)]
    pub number_of_tasks: usize,

    /// Maximum size of a sampled task subset. Clipped to
    /// `number_of_tasks` when larger.
    #[arg(long)]
    pub max_hyperedge_size: Option<usize>,

    /// Number of subsets to sample and classify.
    #[arg(long)]
    pub num_of_hyperedge: usize,

    /// Generate tasks with implicit deadlines (`d = T`) instead of
    /// constrained deadlines (`d` drawn uniformly in `1..=T`).
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub implicit_deadline: bool,

    /// Load a previously generated `platform.csv` instead of generating a
    /// new platform.
    #[arg(long)]
    pub load_platform: Option<PathBuf>,

    /// Directory to write `platform.csv`, `task_quadruples.csv`,
    /// `hyperedges.csv`, `negative_samples.csv` and
    /// `minimal_unschedulable_combinations.csv` into. Defaults to
    /// `./output/seed_{seed}_p{number_of_processors}_t{number_of_tasks}`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Caps the simulated horizon at `min(hyperperiod, truncated_lcm)`.
    /// Zero or absent means simulate the full hyperperiod.
    #[arg(long)]
    pub truncated_lcm: Option<u64>,

    /// Subsets only proven schedulable up to a truncated horizon are
    /// recorded as hyperedges by default; this flag excludes them
    /// instead.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_record_truncated_as_hyperedge: bool,

    /// `EnvFilter` directive controlling log verbosity, e.g. `info` or
    /// `edf_hyperedge_gen=debug,warn`.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory for rotating log files. When absent, logs go to stderr
    /// only.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Also dump per-subset processor execution history as Gantt-style
    /// CSVs under `<output-dir>/gantt/`.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub gantt: bool,
}
