//! # Error Types — Classified Reconciliation Failures
//!
//! Every check the reconciliation stages perform is a named precondition or
//! postcondition with its own error variant. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Reconciliation errors are fatal. No stage retries or emits a partial
//!   table after one of these.
//! - Every message enumerates the offending categories or rules so the table
//!   author can fix the configuration without re-running under a debugger.
//! - Construction errors (vocabularies, condition schemas) are separate from
//!   stage errors: they are raised before any rule is touched.

use thiserror::Error;

use crate::category::Category;

/// Which side of the reconciliation a vocabulary belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularySide {
    /// The vocabulary the input table is written in.
    Legacy,
    /// The vocabulary the output table must be written in.
    Target,
}

impl std::fmt::Display for VocabularySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Which endpoint of a rule a check was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The rule's `source` category.
    Source,
    /// The rule's `target` category.
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// A failed precondition or postcondition of a reconciliation stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// A raw code has no entry in the enumeration used to translate it.
    #[error("unknown code {code} in column {column:?} at row {row}")]
    UnknownCode {
        /// Column (or condition field) the code was read from.
        column: String,
        /// The untranslatable code.
        code: u32,
        /// 1-based row number in the input table.
        row: usize,
    },

    /// The category map no longer matches the declared residual sets.
    #[error(
        "{side} vocabulary drift: unexpected [{}], missing [{}]",
        join(.unexpected),
        join(.missing)
    )]
    VocabularyMismatch {
        /// Vocabulary whose residual set disagrees with the declaration.
        side: VocabularySide,
        /// Ids that are unmapped (or unknown) but were not declared.
        unexpected: Vec<Category>,
        /// Ids declared as residual that the map actually covers (or that do not exist).
        missing: Vec<Category>,
    },

    /// Removing the category would leave other categories unreachable.
    #[error("cannot remove {category}: it is the only source of [{}]", join(.orphaned))]
    UnsafeRemoval {
        /// Category slated for removal.
        category: Category,
        /// Categories that only `category` transitions into.
        orphaned: Vec<Category>,
    },

    /// Removing the category dropped no rows, which signals a typo.
    #[error("removing {category} dropped no rules")]
    NoOpRemoval {
        /// Category slated for removal.
        category: Category,
    },

    /// The expansion preconditions or row-count postcondition failed.
    #[error("cannot expand {category}: {reason}")]
    InvalidExpansion {
        /// Category being expanded.
        category: Category,
        /// What was violated.
        reason: String,
    },

    /// Two rules would collapse into one once the merge candidates are unified.
    #[error("merging on {role} would duplicate rules: {}", .conflicts.join("; "))]
    MergeConflict {
        /// Endpoint role where the merge candidates appear.
        role: Endpoint,
        /// Rendered groups of conflicting rules.
        conflicts: Vec<String>,
    },

    /// The `(source, target, conditions)` uniqueness invariant is violated.
    #[error("duplicate rules after {stage}: {}", .duplicates.join("; "))]
    DuplicateRule {
        /// Stage after which the duplicates were found.
        stage: &'static str,
        /// Rendered groups of duplicate rules.
        duplicates: Vec<String>,
    },

    /// A rule refers to a category the target vocabulary does not define.
    #[error("category {category} is not in the target vocabulary (rule {rule})")]
    UnknownCategory {
        /// The stale category.
        category: Category,
        /// Rendered rule that carries it.
        rule: String,
    },
}

/// Error while building or querying a category vocabulary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VocabularyError {
    /// The token is empty or contains whitespace.
    #[error("invalid category identifier: {0:?}")]
    InvalidCategory(String),

    /// Two entries share a numeric code.
    #[error("vocabulary {vocabulary:?} assigns code {code} twice")]
    DuplicateCode {
        /// Vocabulary name.
        vocabulary: String,
        /// Reused code.
        code: u32,
    },

    /// Two entries share an identifier.
    #[error("vocabulary {vocabulary:?} defines {id} twice")]
    DuplicateId {
        /// Vocabulary name.
        vocabulary: String,
        /// Reused identifier.
        id: Category,
    },

    /// The vocabulary has no entries.
    #[error("vocabulary {0:?} is empty")]
    Empty(String),

    /// Codes are not `0..len` in declaration order.
    #[error("vocabulary {vocabulary:?} is not dense and zero-based: expected code {expected}, found {found}")]
    NotDense {
        /// Vocabulary name.
        vocabulary: String,
        /// Code expected at this position.
        expected: u32,
        /// Code actually declared.
        found: u32,
    },

    /// No built-in vocabulary has this name.
    #[error("unknown vocabulary preset: {0:?}")]
    UnknownPreset(String),
}

/// Error while building a condition schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The schema declares no condition fields.
    #[error("condition schema has no fields")]
    Empty,

    /// Two fields share a name.
    #[error("condition field {0:?} declared twice")]
    DuplicateField(String),

    /// A field has no values.
    #[error("condition field {0:?} has no values")]
    EmptyDomain(String),

    /// A field assigns one code to two values.
    #[error("condition field {field:?} assigns code {code} twice")]
    DuplicateCode {
        /// Field name.
        field: String,
        /// Reused code.
        code: u32,
    },

    /// A flag field is not exactly `{0: FALSE, 1: TRUE}`.
    #[error("flag field {0:?} must map 0 to FALSE and 1 to TRUE")]
    InvalidFlag(String),

    /// No built-in schema has this name.
    #[error("unknown condition schema preset: {0:?}")]
    UnknownPreset(String),
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(s: &str) -> Category {
        Category::new(s).unwrap()
    }

    #[test]
    fn vocabulary_mismatch_lists_both_sides() {
        let err = ReconcileError::VocabularyMismatch {
            side: VocabularySide::Legacy,
            unexpected: vec![cat("urban"), cat("pasture")],
            missing: vec![cat("cropland")],
        };
        assert_eq!(
            err.to_string(),
            "legacy vocabulary drift: unexpected [urban, pasture], missing [cropland]"
        );
    }

    #[test]
    fn unsafe_removal_names_orphans() {
        let err = ReconcileError::UnsafeRemoval {
            category: cat("urban"),
            orphaned: vec![cat("burnt")],
        };
        assert!(err.to_string().contains("only source of [burnt]"));
    }

    #[test]
    fn merge_conflict_joins_groups() {
        let err = ReconcileError::MergeConflict {
            role: Endpoint::Source,
            conflicts: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "merging on source would duplicate rules: a; b");
    }
}
