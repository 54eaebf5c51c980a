//! Train command - Train a baseline or guided Q-table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::{
    adapters::{CastleRules, SimulatedCastle},
    app::{App, AppBuilder},
    cli::{
        config::FileConfig,
        output::{format_number, format_rate, print_kv, print_section},
    },
    pipeline::{ConsoleRenderer, JsonlObserver, ProgressObserver, TrainingPipeline},
    ports::Trainer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Visit-count learning rate, uniform exploration, no step cap
    Baseline,
    /// Fixed learning rate, heuristic exploration, reward shaping
    Guided,
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-table against the simulated castle")]
pub struct TrainArgs {
    /// Which trainer to run
    #[arg(value_enum)]
    pub algorithm: Algorithm,

    /// Number of training episodes (overrides the config file)
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained table
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for a JSONL trace of every step
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Print a status line for every step
    #[arg(long)]
    pub render: bool,

    /// JSON file with trainer hyperparameters
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Algorithm {
    /// Default artifact name for each trainer.
    pub fn default_output(self) -> &'static str {
        match self {
            Algorithm::Baseline => "q_table.msgpack",
            Algorithm::Guided => "guided_q_table.msgpack",
        }
    }
}

fn build_app(seed: Option<u64>) -> App {
    let builder = AppBuilder::new();
    match seed {
        Some(seed) => builder.with_default_seed(seed).build(),
        None => builder.build(),
    }
}

fn create_trainer(
    app: &App,
    algorithm: Algorithm,
    file_config: &FileConfig,
) -> Result<Box<dyn Trainer>> {
    let trainer: Box<dyn Trainer> = match algorithm {
        Algorithm::Baseline => Box::new(app.create_baseline(file_config.baseline.clone())?),
        Algorithm::Guided => Box::new(app.create_guided(file_config.guided.clone())?),
    };
    Ok(trainer)
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::load(path),
        None => Ok(FileConfig::default()),
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let file_config = load_file_config(args.config.as_deref())?;

    let mut training_config = file_config.training_config();
    if let Some(episodes) = args.episodes {
        training_config.num_episodes = episodes;
    }
    if args.seed.is_some() {
        training_config.seed = args.seed;
    }
    let seed = training_config.seed;

    let app = build_app(seed);
    let mut trainer = create_trainer(&app, args.algorithm, &file_config)?;
    let mut env = SimulatedCastle::new(CastleRules::default(), seed);

    println!("\n=== Training {} ===", trainer.name());
    println!("Episodes: {}", format_number(training_config.num_episodes));
    if let Some(seed) = seed {
        println!("Seed: {seed}");
    }

    let mut pipeline = TrainingPipeline::new(training_config);
    if !args.no_progress && !args.render {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(trace) = &args.trace {
        let observer = JsonlObserver::new(trace)
            .with_context(|| format!("Failed to create trace file {}", trace.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }
    if args.render {
        pipeline = pipeline.with_observer(Box::new(ConsoleRenderer::default()));
    }

    let result = pipeline.run(&mut *trainer, &mut env)?;

    print_section("Training Complete");
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv(
        "Successes",
        &format!(
            "{} ({})",
            format_number(result.successes),
            format_rate(result.success_rate)
        ),
    );
    print_kv("Truncated", &format_number(result.truncated));
    print_kv("Mean reward", &format!("{:.2}", result.mean_reward));
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    print_kv("States learned", &format_number(result.table_size));

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.algorithm.default_output()));
    let saved = app.snapshot(&*trainer, &result, seed);
    app.save_table(&saved, &output)
        .with_context(|| format!("Failed to save table to {}", output.display()))?;
    println!("\nQ-table saved to {}", output.display());

    if let Some(summary) = &args.summary {
        result
            .save(summary)
            .with_context(|| format!("Failed to write summary to {}", summary.display()))?;
        info!(path = %summary.display(), "training summary written");
    }

    Ok(())
}
