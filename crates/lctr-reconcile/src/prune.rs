//! # Row Pruner
//!
//! Deletes every rule that starts or ends in a category slated for
//! removal. Each category is cleared by the exclusivity guard first, on the
//! rule set as it stands after the previous removals.

use lctr_core::{Category, ReconcileError, RuleSet};

use crate::guard::exclusivity;

/// Remove `categories` one at a time.
///
/// Fails with `UnsafeRemoval` if a category is the only source of another,
/// and with `NoOpRemoval` if a removal drops no rule (usually a typo in the
/// configuration).
pub fn prune(rules: &RuleSet, categories: &[Category]) -> Result<RuleSet, ReconcileError> {
    let mut current = rules.clone();
    for category in categories {
        let report = exclusivity(&current, category);
        if report.is_sole_source() {
            return Err(ReconcileError::UnsafeRemoval {
                category: category.clone(),
                orphaned: report.orphaned,
            });
        }

        let before = current.len();
        let next = current.filtered(|r| !r.touches(category));
        if next.len() >= before {
            return Err(ReconcileError::NoOpRemoval {
                category: category.clone(),
            });
        }
        tracing::info!(%category, dropped = before - next.len(), "removed category");
        current = next;
    }
    Ok(current)
}
