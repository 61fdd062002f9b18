//! # Summarise Subcommand
//!
//! Translates a legacy table and lists, for each distinct non-reflexive
//! `(source, target)` pair, the number of rules and their duration range.
//! Useful for inspecting a table before deciding on removals and merges.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lctr_reconcile::summarise;

use crate::load_config;
use crate::table::{read_raw_table, render_summary};

/// Arguments for the `lctr summarise` subcommand.
#[derive(Args, Debug)]
pub struct SummariseArgs {
    /// Legacy transition table (CSV).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Reconciliation configuration; only its legacy vocabulary, condition
    /// schema and table layout are used.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output path for the summary CSV. Written to stdout if omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the summarise subcommand.
pub fn run_summarise(args: &SummariseArgs) -> Result<u8> {
    let pipeline = load_config(args.config.as_deref())?
        .build()
        .context("invalid reconciliation configuration")?;
    let raw = read_raw_table(&args.input, pipeline.layout(), pipeline.schema())?;
    let rules = pipeline
        .translate(&raw)
        .with_context(|| format!("failed to translate {}", args.input.display()))?;

    let summary = summarise(&rules);
    let bytes = render_summary(&summary)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write summary: {}", path.display()))?;
            println!("OK: wrote {} transitions to {}", summary.len(), path.display());
        }
        None => std::io::stdout()
            .write_all(&bytes)
            .context("failed to write summary to stdout")?,
    }
    Ok(0)
}
