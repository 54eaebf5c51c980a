//! Castle Escape CLI - Tabular Q-learning trainers for a pursuit-evasion MDP
//!
//! This CLI provides a unified interface for:
//! - Training the baseline or heuristic-guided trainer
//! - Replaying a trained table greedily
//! - Inspecting saved tables

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "castle")]
#[command(version, about = "Q-learning trainers for the Castle Escape game", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table (baseline or guided)
    Train(castle_escape::cli::commands::train::TrainArgs),

    /// Run one greedy episode with a trained table
    Evaluate(castle_escape::cli::commands::evaluate::EvaluateArgs),

    /// Show a trained table's metadata and policy
    Inspect(castle_escape::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    castle_escape::telemetry::init(cli.verbose)?;

    match cli.command {
        Commands::Train(args) => castle_escape::cli::commands::train::execute(args),
        Commands::Evaluate(args) => castle_escape::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => castle_escape::cli::commands::inspect::execute(args),
    }
}
