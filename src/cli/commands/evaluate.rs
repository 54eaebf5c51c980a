//! Evaluate command - Replay a trained table greedily

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    Error,
    adapters::{CastleRules, SimulatedCastle},
    app::App,
    cli::output::{print_artifact_info, print_kv, print_section},
    pipeline::{ConsoleRenderer, EvaluationReport, GreedyEvaluator},
    ports::{Environment, Observer},
};

#[derive(Parser, Debug)]
#[command(about = "Run one greedy episode with a trained table")]
pub struct EvaluateArgs {
    /// Path to the trained table
    pub table: PathBuf,

    /// Random seed for the environment
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abandon the episode after this many steps (0 = no limit)
    #[arg(long, default_value_t = 1_000)]
    pub max_steps: usize,

    /// Print a status line for every step
    #[arg(long)]
    pub render: bool,
}

/// How an evaluation run ended, as far as the command line is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Completed(EvaluationReport),
    /// No artifact at the given path
    MissingArtifact(PathBuf),
    /// The artifact could not be loaded or replayed
    Unusable(String),
}

/// Load and replay a table, classifying the expected failure modes.
pub fn evaluate(app: &App, args: &EvaluateArgs) -> Result<EvaluationOutcome> {
    let saved = match app.load_table(&args.table) {
        Ok(saved) => saved,
        Err(Error::ArtifactNotFound { path }) => {
            return Ok(EvaluationOutcome::MissingArtifact(path));
        }
        Err(err) => return Ok(EvaluationOutcome::Unusable(err.to_string())),
    };

    println!("Loaded table from: {}", args.table.display());
    print_artifact_info(&saved);

    let mut evaluator = GreedyEvaluator::new(saved.table());
    if args.max_steps > 0 {
        evaluator = evaluator.with_step_limit(args.max_steps);
    }

    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if args.render {
        observers.push(Box::new(ConsoleRenderer::default()));
    }

    let mut env = SimulatedCastle::new(CastleRules::default(), args.seed);
    match evaluator.run(&mut env, &mut observers) {
        Ok(report) => {
            print_final_state(&env);
            Ok(EvaluationOutcome::Completed(report))
        }
        Err(err) => Ok(EvaluationOutcome::Unusable(err.to_string())),
    }
}

fn print_final_state(env: &dyn Environment) {
    let world = env.current_state();
    print_section("Final State");
    print_kv("Position", &world.player_position.to_string());
    print_kv("Health", env.health_label(world.player_health));
    let guards = world
        .guard_positions
        .iter()
        .map(|(id, room)| format!("{id}@{room}"))
        .collect::<Vec<_>>()
        .join(" ");
    print_kv("Guards", &guards);
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();
    match evaluate(&app, &args)? {
        EvaluationOutcome::Completed(report) => {
            print_section("Evaluation");
            print_kv("Steps", &report.steps.to_string());
            if report.truncated {
                print_kv("Stopped", "step limit reached");
            }
            println!(
                "Test complete: {}",
                if report.success { "SUCCESS" } else { "FAILURE" }
            );
            println!("Total reward: {}", report.total_reward);
        }
        EvaluationOutcome::MissingArtifact(path) => {
            println!(
                "No trained table found at {}. Run the train command first.",
                path.display()
            );
        }
        EvaluationOutcome::Unusable(message) => {
            println!("Error loading or testing agent: {message}");
        }
    }
    Ok(())
}
