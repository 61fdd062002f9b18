//! # lctr-core — Foundational Types for Transition Table Reconciliation
//!
//! This crate defines the vocabulary of the reconciliation engine: category
//! identifiers, data-driven category vocabularies, condition schemas,
//! transition rules and rule sets, the classified error taxonomy, and the
//! digest used to prove output determinism. Every other crate in the
//! workspace depends on `lctr-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Vocabularies are data.** A `CategoryVocabulary` is a validated list
//!    of `(code, id, alias)` entries, not a language enum, so the legacy and
//!    target vocabularies can be diffed and checked against each other.
//!
//! 2. **Rule identity is `(source, target, conditions)`.** The duration
//!    payload never participates in equality or hashing.
//!
//! 3. **Conditions order by domain code.** `ConditionVector` ordering is the
//!    natural order of each field's domain, left to right.
//!
//! 4. **Every failed check has a name.** `ReconcileError` classifies each
//!    precondition and postcondition the stages enforce.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lctr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod category;
pub mod condition;
pub mod digest;
pub mod error;
pub mod rule;
pub mod vocabulary;

// Re-export primary types for ergonomic imports.
pub use category::Category;
pub use condition::{
    ConditionField, ConditionKind, ConditionLabel, ConditionSchema, ConditionValue,
    ConditionVector, DomainValue,
};
pub use digest::{sha256_hex, TableDigest};
pub use error::{Endpoint, ReconcileError, SchemaError, VocabularyError, VocabularySide};
pub use rule::{RawRule, RuleKey, RuleSet, TransitionRule};
pub use vocabulary::{CategoryVocabulary, VocabularyEntry};
