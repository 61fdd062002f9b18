//! # lctr-reconcile — Transition Table Reconciliation
//!
//! Turns a legacy land-cover transition table, keyed by integer codes in an
//! old vocabulary, into a canonical table over a new vocabulary.
//!
//! ## Stages
//!
//! - **Translate** (`translate.rs`): integer codes to category ids and
//!   condition labels.
//! - **Rename** (`rename.rs`): legacy ids to target ids through a
//!   validated category map.
//! - **Guard + Prune** (`guard.rs`, `prune.rs`): remove categories, refusing
//!   any removal that would leave another category unreachable.
//! - **Expand** (`expand.rs`): clone a source-only category's rules onto
//!   several replacements.
//! - **Merge** (`merge.rs`): unify two categories, refusing merges that
//!   would collapse rules.
//! - **Drop reflexive** (`reflexive.rs`): remove self-transitions.
//! - **Canonicalize** (`canonical.rs`): fixed order and dense ids.
//!
//! [`config::ReconcileConfig`] describes a reconciliation declaratively and
//! builds a [`pipeline::Pipeline`] that runs the stages in order.
//!
//! ## Duplicate Invariant
//!
//! No two rules may share `(source, target, conditions)`. The invariant is
//! re-checked after every stage that rewrites categories (rename, expand,
//! merge); see `duplicates.rs`.

pub mod canonical;
pub mod config;
pub mod duplicates;
pub mod expand;
pub mod guard;
pub mod merge;
pub mod pipeline;
pub mod prune;
pub mod reflexive;
pub mod rename;
pub mod summary;
pub mod translate;

pub use canonical::{canonicalize, CanonicalRule, CanonicalTable};
pub use config::{
    ConfigError, ExpansionSpec, MergeSpec, OutputNames, ReconcileConfig, SchemaSource,
    TableLayout, VocabularySource,
};
pub use duplicates::{duplicate_groups, ensure_unique};
pub use expand::expand;
pub use guard::{exclusivity, is_sole_source, ExclusivityReport};
pub use merge::merge;
pub use pipeline::{
    Pipeline, PipelineError, PipelineOutput, PipelineReport, Stage, StageReport,
};
pub use prune::prune;
pub use reflexive::drop_reflexive;
pub use rename::{rename, CategoryMap, Residuals};
pub use summary::{summarise, TransitionSummary};
pub use translate::translate;
