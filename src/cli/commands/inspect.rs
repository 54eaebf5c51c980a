//! Inspect command - Show the contents of a trained table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    Error,
    app::App,
    cli::output::{format_row, print_artifact_info, print_section},
    encoding::StateIndex,
    q_learning::SavedQTable,
    types::Action,
    utils::argmax,
};

#[derive(Parser, Debug)]
#[command(about = "Print a trained table's metadata and greedy policy")]
pub struct InspectArgs {
    /// Path to the trained table
    pub table: PathBuf,

    /// Show at most this many states
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// One line of the policy listing.
pub fn describe_state(state: StateIndex) -> String {
    let (row, col, health, guard) = state.components();
    let guard = if guard == 0 {
        "-".to_string()
    } else {
        format!("G{guard}")
    };
    format!("({row}, {col}) h{health} {guard:>2}")
}

/// Rows in ascending state order with their greedy action.
pub fn policy_rows(saved: &SavedQTable, limit: Option<usize>) -> Vec<String> {
    saved
        .table()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(state, values)| {
            format!(
                "{:>3}  {:<16} {:<6} {}",
                state.value(),
                describe_state(state),
                Action::ALL[argmax(values)].name(),
                format_row(values)
            )
        })
        .collect()
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::new();
    let saved = match app.load_table(&args.table) {
        Ok(saved) => saved,
        Err(Error::ArtifactNotFound { path }) => {
            println!("No trained table found at {}.", path.display());
            return Ok(());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to load {}", args.table.display()));
        }
    };

    print_section("Trained Table");
    print_artifact_info(&saved);

    print_section("Greedy Policy");
    let header = Action::ALL
        .iter()
        .map(|a| format!("{:>10}", a.name()))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{:>3}  {:<16} {:<6} {header}", "idx", "state", "best");
    for line in policy_rows(&saved, args.limit) {
        println!("{line}");
    }
    Ok(())
}
