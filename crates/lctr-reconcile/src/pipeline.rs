//! # Pipeline Driver
//!
//! Runs the stages in their fixed order:
//!
//! ```text
//! translate → rename → prune (guarded, per category) → expand → merge
//!           → drop reflexive → canonicalize
//! ```
//!
//! Expansions run before merges. The first failing stage aborts the run;
//! the error names the stage and carries the last rule set that passed.

use std::fmt;
use std::slice;

use serde::Serialize;
use thiserror::Error;

use lctr_core::{
    Category, CategoryVocabulary, ConditionSchema, RawRule, ReconcileError, RuleSet,
};

use crate::canonical::{canonicalize, CanonicalTable};
use crate::config::{ExpansionSpec, MergeSpec, OutputNames, TableLayout};
use crate::expand::expand;
use crate::merge::merge;
use crate::prune::prune;
use crate::reflexive::drop_reflexive;
use crate::rename::{rename, CategoryMap};
use crate::translate::translate;

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Translate,
    Rename,
    Prune,
    Expand,
    Merge,
    DropReflexive,
    Canonicalize,
}

impl Stage {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rename => "rename",
            Self::Prune => "prune",
            Self::Expand => "expand",
            Self::Merge => "merge",
            Self::DropReflexive => "drop_reflexive",
            Self::Canonicalize => "canonicalize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts around one executed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    /// What the stage acted on, e.g. the removed or merged categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Every executed stage, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub table: CanonicalTable,
    pub report: PipelineReport,
}

/// A stage failed.
#[derive(Error, Debug)]
#[error("{stage} stage failed{}: {source}", subject_suffix(.subject))]
pub struct PipelineError {
    pub stage: Stage,
    pub subject: Option<String>,
    #[source]
    pub source: ReconcileError,
    /// Output of the last stage that succeeded.
    pub last_good: Box<RuleSet>,
}

fn subject_suffix(subject: &Option<String>) -> String {
    subject
        .as_deref()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default()
}

/// A validated reconciliation, built by
/// [`ReconcileConfig::build`](crate::config::ReconcileConfig::build).
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub(crate) legacy: CategoryVocabulary,
    pub(crate) target: CategoryVocabulary,
    pub(crate) schema: ConditionSchema,
    pub(crate) layout: TableLayout,
    pub(crate) output_names: OutputNames,
    pub(crate) category_map: CategoryMap,
    pub(crate) remove: Vec<Category>,
    pub(crate) expand: Vec<ExpansionSpec>,
    pub(crate) merge: Vec<MergeSpec>,
}

impl Pipeline {
    pub fn legacy(&self) -> &CategoryVocabulary {
        &self.legacy
    }

    pub fn target(&self) -> &CategoryVocabulary {
        &self.target
    }

    pub fn schema(&self) -> &ConditionSchema {
        &self.schema
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn output_names(&self) -> OutputNames {
        self.output_names
    }

    pub fn category_map(&self) -> &CategoryMap {
        &self.category_map
    }

    /// Translate a raw table without reconciling it.
    pub fn translate(&self, raw: &[RawRule]) -> Result<RuleSet, PipelineError> {
        translate(raw, &self.legacy, &self.schema, &self.layout).map_err(|source| PipelineError {
            stage: Stage::Translate,
            subject: None,
            source,
            last_good: Box::default(),
        })
    }

    /// Run every stage over `raw`.
    pub fn run(&self, raw: &[RawRule]) -> Result<PipelineOutput, PipelineError> {
        let mut run = Run::default();

        let translated = self.translate(raw)?;
        run.record(Stage::Translate, None, raw.len(), translated.len());
        let mut current = translated;

        current = run.step(Stage::Rename, None, current, |rules| {
            rename(rules, &self.category_map, &self.legacy, &self.target)
        })?;

        for category in &self.remove {
            current = run.step(Stage::Prune, Some(category.to_string()), current, |rules| {
                prune(rules, slice::from_ref(category))
            })?;
        }

        for spec in &self.expand {
            let subject = format!("{} -> {}", spec.category, join(&spec.into));
            current = run.step(Stage::Expand, Some(subject), current, |rules| {
                expand(rules, &spec.category, &spec.into)
            })?;
        }

        for spec in &self.merge {
            let [a, b] = &spec.categories;
            let subject = format!("{a} + {b} -> {}", spec.into);
            current = run.step(Stage::Merge, Some(subject), current, |rules| {
                merge(rules, a, b, &spec.into)
            })?;
        }

        current = run.step(Stage::DropReflexive, None, current, |rules| {
            Ok(drop_reflexive(rules))
        })?;

        let table = canonicalize(&current, &self.target).map_err(|source| PipelineError {
            stage: Stage::Canonicalize,
            subject: None,
            source,
            last_good: Box::new(current.clone()),
        })?;
        run.record(Stage::Canonicalize, None, current.len(), table.len());

        tracing::info!(rules = table.len(), stages = run.report.stages.len(), "reconciliation complete");
        Ok(PipelineOutput {
            table,
            report: run.report,
        })
    }
}

#[derive(Default)]
struct Run {
    report: PipelineReport,
}

impl Run {
    fn record(&mut self, stage: Stage, subject: Option<String>, rows_in: usize, rows_out: usize) {
        tracing::info!(
            %stage,
            subject = subject.as_deref().unwrap_or(""),
            rows_in,
            rows_out,
            "stage complete"
        );
        self.report.stages.push(StageReport {
            stage,
            subject,
            rows_in,
            rows_out,
        });
    }

    fn step(
        &mut self,
        stage: Stage,
        subject: Option<String>,
        current: RuleSet,
        apply: impl FnOnce(&RuleSet) -> Result<RuleSet, ReconcileError>,
    ) -> Result<RuleSet, PipelineError> {
        match apply(&current) {
            Ok(out) => {
                self.record(stage, subject, current.len(), out.len());
                Ok(out)
            }
            Err(source) => {
                tracing::error!(%stage, error = %source, "stage failed");
                Err(PipelineError {
                    stage,
                    subject,
                    source,
                    last_good: Box::new(current),
                })
            }
        }
    }
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
