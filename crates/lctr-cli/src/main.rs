//! # lctr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lctr_cli::reconcile::{run_reconcile, ReconcileArgs};
use lctr_cli::summarise::{run_summarise, SummariseArgs};
use lctr_cli::vocab::{run_vocab, VocabArgs};

/// Land-cover transition table reconciliation.
///
/// Recasts a legacy succession rule table onto a new land-cover vocabulary:
/// renames, removes, expands and merges categories, then writes the table
/// in a canonical, byte-reproducible order.
#[derive(Parser, Debug)]
#[command(name = "lctr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a legacy table and write the canonical table.
    Reconcile(ReconcileArgs),

    /// Summarise the transitions of a legacy table.
    Summarise(SummariseArgs),

    /// Show both vocabularies and the category map's residuals.
    Vocab(VocabArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Reconcile(args) => run_reconcile(&args),
        Commands::Summarise(args) => run_summarise(&args),
        Commands::Vocab(args) => run_vocab(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
