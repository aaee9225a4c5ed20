use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use edf_hyperedge_gen::cli::Args;
use edf_hyperedge_gen::error::AppError;
use edf_hyperedge_gen::generator::{generate_platform, generate_tasks};
use edf_hyperedge_gen::output::{self, OutputSink};
use edf_hyperedge_gen::search::{SearchConfig, SearchEngine};

fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match edf_hyperedge_gen::logging::init(&args.log_level, args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize logging: {err}");
            return ExitCode::from(1);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Configuration(msg)) => {
            tracing::error!("{msg}");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    if args.number_of_tasks == 0 {
        return Err(AppError::Configuration("number-of-tasks must be >= 1".into()));
    }
    if args.num_of_hyperedge == 0 {
        return Err(AppError::Configuration("num-of-hyperedge must be >= 1".into()));
    }

    let mut rng = StdRng::seed_from_u64(args.seed);

    let processors = match &args.load_platform {
        Some(path) => output::read_platform(path)?,
        None => {
            if args.number_of_processors == 0 {
                return Err(AppError::Configuration("number-of-processors must be >= 1".into()));
            }
            generate_platform(args.number_of_processors, &mut rng)
        }
    };
    if processors.is_empty() {
        return Err(AppError::Configuration("platform has no processors".into()));
    }

    let tasks = generate_tasks(args.number_of_tasks, args.implicit_deadline, &mut rng);
    let max_hyperedge_size = args
        .max_hyperedge_size
        .unwrap_or(tasks.len())
        .min(tasks.len());

    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "output/seed_{}_p{}_t{}",
            args.seed,
            processors.len(),
            tasks.len()
        ))
    });

    output::write_platform(&output_dir, &processors)?;
    output::write_tasks(&output_dir, &tasks)?;

    tracing::info!(
        processors = processors.len(),
        tasks = tasks.len(),
        "generated platform and task set"
    );

    let config = SearchConfig {
        truncated_lcm: args.truncated_lcm,
        record_truncated_as_hyperedge: !args.no_record_truncated_as_hyperedge,
        record_gantt: args.gantt,
    };

    let mut sink = OutputSink::create(&output_dir)?;
    let mut engine = SearchEngine::new(&tasks, processors, config, &mut sink);
    engine.generate_hyperedges(max_hyperedge_size, args.num_of_hyperedge, &mut rng)?;

    tracing::info!(
        positive = engine.positive_set().len(),
        negative = engine.negative_set().len(),
        muc = engine.muc_set().len(),
        "search complete"
    );

    Ok(())
}
