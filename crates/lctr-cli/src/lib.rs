//! # lctr-cli — Transition Table Reconciliation CLI
//!
//! Provides the `lctr` command-line interface over `lctr-reconcile`.
//!
//! ## Subcommands
//!
//! - `lctr reconcile` — Run the pipeline and write (or `--check`) the
//!   canonical table.
//! - `lctr summarise` — Per-pair transition summary of a legacy table.
//! - `lctr vocab` — Vocabularies and category map residuals.
//!
//! ```bash
//! lctr reconcile millington_succession.csv --out agrosuccess.csv
//! lctr reconcile millington_succession.csv --out agrosuccess.csv --check
//! lctr vocab --config my_reconciliation.yaml
//! ```
//!
//! Without `--config`, the bundled Millington 2009 → AgroSuccess
//! configuration is used.
//!
//! ## Exit Codes
//!
//! 0 on success, 1 when `--check` finds a difference, 2 on any other error.

pub mod reconcile;
pub mod summarise;
pub mod table;
pub mod vocab;

use std::path::Path;

use anyhow::{Context, Result};

use lctr_reconcile::ReconcileConfig;

/// Load a configuration file, or the bundled AgroSuccess configuration.
pub fn load_config(path: Option<&Path>) -> Result<ReconcileConfig> {
    let Some(path) = path else {
        tracing::debug!("using bundled agrosuccess configuration");
        return ReconcileConfig::agrosuccess().context("bundled configuration is invalid");
    };
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration: {}", path.display()))?;
    ReconcileConfig::from_yaml_str(&yaml)
        .with_context(|| format!("failed to load configuration: {}", path.display()))
}
