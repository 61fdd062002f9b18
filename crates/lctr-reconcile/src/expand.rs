//! # Category Expander
//!
//! Replaces a legacy category with several target categories. Every rule
//! starting at the old category is cloned once per new category; the
//! condition vector, target and duration are copied verbatim.
//!
//! Expansion is only defined for pure sources. If something transitioned
//! *into* the old category there would be no way to choose which of the
//! new categories it should reach.

use std::collections::BTreeSet;

use lctr_core::{Category, ReconcileError, RuleSet, TransitionRule};

use crate::duplicates::ensure_unique;

/// Replace `old` by each of `new_categories` as a rule source.
///
/// Untouched rules keep their order; the clones follow, grouped by new
/// category in the order given.
pub fn expand(
    rules: &RuleSet,
    old: &Category,
    new_categories: &[Category],
) -> Result<RuleSet, ReconcileError> {
    let invalid = |reason: String| ReconcileError::InvalidExpansion {
        category: old.clone(),
        reason,
    };

    if new_categories.is_empty() {
        return Err(invalid("no replacement categories given".into()));
    }
    if new_categories.contains(old) {
        return Err(invalid("replacement equals the expanded category".into()));
    }
    let mut seen = BTreeSet::new();
    if let Some(repeat) = new_categories.iter().find(|c| !seen.insert(*c)) {
        return Err(invalid(format!("replacement {repeat} listed twice")));
    }
    let incoming = rules.iter().filter(|r| &r.target == old).count();
    if incoming > 0 {
        return Err(invalid(format!("{incoming} rules transition into it")));
    }

    let (matched, kept): (Vec<&TransitionRule>, Vec<&TransitionRule>) =
        rules.iter().partition(|r| &r.source == old);

    let mut out: Vec<TransitionRule> = kept.into_iter().cloned().collect();
    for replacement in new_categories {
        out.extend(matched.iter().map(|r| TransitionRule {
            source: replacement.clone(),
            ..(*r).clone()
        }));
    }

    let expected = rules.len() - matched.len() + new_categories.len() * matched.len();
    if out.len() != expected {
        return Err(invalid(format!(
            "expected {expected} rules after expansion, found {}",
            out.len()
        )));
    }

    let out = RuleSet::new(out);
    ensure_unique(&out, "expand")?;
    tracing::info!(
        category = %old,
        into = new_categories.len(),
        matched = matched.len(),
        rules = out.len(),
        "expanded category"
    );
    Ok(out)
}
