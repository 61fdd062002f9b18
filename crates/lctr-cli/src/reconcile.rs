//! # Reconcile Subcommand
//!
//! Runs the full pipeline over a legacy table and writes the canonical
//! table, or with `--check` verifies that an existing output file still
//! matches byte for byte.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use lctr_core::TableDigest;

use crate::load_config;
use crate::table::{read_raw_table, render_canonical};

/// Arguments for the `lctr reconcile` subcommand.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Legacy transition table (CSV).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Reconciliation configuration (YAML). Defaults to the bundled
    /// AgroSuccess configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output path for the canonical table. Written to stdout if omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Verify the existing output file instead of writing it.
    #[arg(long, requires = "out")]
    pub check: bool,

    /// Also write the per-stage report as JSON.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Execute the reconcile subcommand.
///
/// Returns exit code: 0 on success, 1 if `--check` fails.
pub fn run_reconcile(args: &ReconcileArgs) -> Result<u8> {
    let pipeline = load_config(args.config.as_deref())?
        .build()
        .context("invalid reconciliation configuration")?;

    let raw = read_raw_table(&args.input, pipeline.layout(), pipeline.schema())?;
    let output = pipeline
        .run(&raw)
        .with_context(|| format!("failed to reconcile {}", args.input.display()))?;

    let bytes = render_canonical(
        &output.table,
        pipeline.layout(),
        pipeline.schema(),
        pipeline.target(),
        pipeline.output_names(),
    )?;
    let digest = TableDigest::of(&bytes);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write report: {}", path.display()))?;
    }

    if args.check {
        let Some(out_path) = &args.out else {
            bail!("--check requires --out");
        };
        if !out_path.exists() {
            println!("FAIL: output does not exist: {}", out_path.display());
            return Ok(1);
        }
        let existing = std::fs::read(out_path)
            .with_context(|| format!("failed to read output: {}", out_path.display()))?;
        if existing == bytes {
            println!("OK: {} is up to date ({} rules)", out_path.display(), output.table.len());
            println!("  Digest: {digest}");
            Ok(0)
        } else {
            println!("FAIL: {} differs from the reconciled table", out_path.display());
            println!("  Expected digest: {digest}");
            println!("  Existing digest: {}", TableDigest::of(&existing));
            Ok(1)
        }
    } else if let Some(out_path) = &args.out {
        std::fs::write(out_path, &bytes)
            .with_context(|| format!("failed to write output: {}", out_path.display()))?;
        println!("OK: wrote {} rules to {}", output.table.len(), out_path.display());
        println!("  Digest: {digest}");
        Ok(0)
    } else {
        std::io::stdout()
            .write_all(&bytes)
            .context("failed to write table to stdout")?;
        eprintln!("{} rules, {digest}", output.table.len());
        Ok(0)
    }
}
