//! # Vocab Subcommand
//!
//! Prints the legacy and target vocabularies of a configuration together
//! with the residuals of its category map: the legacy ids it leaves
//! unmapped and the target ids it never produces.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use lctr_core::{CategoryVocabulary, VocabularyEntry};
use lctr_reconcile::{Pipeline, Residuals};

use crate::load_config;

/// Arguments for the `lctr vocab` subcommand.
#[derive(Args, Debug)]
pub struct VocabArgs {
    /// Reconciliation configuration (YAML). Defaults to the bundled
    /// AgroSuccess configuration.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct VocabularyView<'a> {
    name: &'a str,
    entries: &'a [VocabularyEntry],
}

impl<'a> From<&'a CategoryVocabulary> for VocabularyView<'a> {
    fn from(vocabulary: &'a CategoryVocabulary) -> Self {
        Self {
            name: vocabulary.name(),
            entries: vocabulary.entries(),
        }
    }
}

#[derive(Serialize)]
struct VocabReport<'a> {
    legacy: VocabularyView<'a>,
    target: VocabularyView<'a>,
    residuals: Residuals,
}

/// Execute the vocab subcommand.
pub fn run_vocab(args: &VocabArgs) -> Result<u8> {
    let pipeline = load_config(args.config.as_deref())?
        .build()
        .context("invalid reconciliation configuration")?;
    let text = if args.json {
        serde_json::to_string_pretty(&report(&pipeline))? + "\n"
    } else {
        render_text(&pipeline)
    };
    print!("{text}");
    Ok(0)
}

fn report(pipeline: &Pipeline) -> VocabReport<'_> {
    VocabReport {
        legacy: pipeline.legacy().into(),
        target: pipeline.target().into(),
        residuals: pipeline
            .category_map()
            .residuals(pipeline.legacy(), pipeline.target()),
    }
}

/// Human-readable listing.
pub fn render_text(pipeline: &Pipeline) -> String {
    let mut out = String::new();
    for (role, vocabulary) in [("legacy", pipeline.legacy()), ("target", pipeline.target())] {
        out.push_str(&format!("{role} vocabulary: {}\n", vocabulary.name()));
        for entry in vocabulary.entries() {
            out.push_str(&format!("  {:>3}  {}", entry.code, entry.id));
            if entry.alias() != entry.id.as_str() {
                out.push_str(&format!(" ({})", entry.alias()));
            }
            out.push('\n');
        }
    }

    let residuals = report(pipeline).residuals;
    for (label, ids) in [
        ("unmapped legacy", &residuals.unmapped_legacy),
        ("unmapped target", &residuals.unmapped_target),
    ] {
        let names: Vec<&str> = ids.iter().map(|c| c.as_str()).collect();
        out.push_str(&format!("{label}: {}\n", names.join(", ")));
    }
    out
}
