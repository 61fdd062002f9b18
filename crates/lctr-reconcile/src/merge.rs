//! # Category Merger
//!
//! Unifies two categories into one. The steps, in order:
//!
//! 1. Drop rules directly between the two candidates; after the merge they
//!    would be meaningless self-loops.
//! 2. Among rules with a candidate as source, no two may share
//!    `(conditions, target)`. Likewise for rules with a candidate as target
//!    and `(conditions, source)`. Otherwise the rename would collapse two
//!    rules that may disagree on duration.
//! 3. Rewrite both candidates to the unified name on both endpoints.
//! 4. Re-check the duplicate invariant over the whole set. This catches
//!    collisions step 2 cannot see, such as two candidate self-loops with
//!    the same conditions.

use std::collections::BTreeMap;

use lctr_core::{Category, ConditionVector, Endpoint, ReconcileError, RuleSet, TransitionRule};

use crate::duplicates::{ensure_unique, render_group};

/// Merge `a` and `b` into `unified`.
///
/// `a` and `b` must differ; the configuration layer rejects self-merges.
pub fn merge(
    rules: &RuleSet,
    a: &Category,
    b: &Category,
    unified: &Category,
) -> Result<RuleSet, ReconcileError> {
    let is_candidate = |c: &Category| c == a || c == b;

    let before = rules.len();
    let rules = rules.filtered(|r| {
        !(is_candidate(&r.source) && is_candidate(&r.target) && r.source != r.target)
    });
    tracing::debug!(
        dropped = before - rules.len(),
        "dropped rules between merge candidates"
    );

    check_role(&rules, Endpoint::Source, &is_candidate)?;
    check_role(&rules, Endpoint::Target, &is_candidate)?;

    let merged: RuleSet = rules
        .iter()
        .map(|rule| {
            let unify = |c: &Category| {
                if is_candidate(c) {
                    unified.clone()
                } else {
                    c.clone()
                }
            };
            TransitionRule {
                source: unify(&rule.source),
                target: unify(&rule.target),
                ..rule.clone()
            }
        })
        .collect();

    ensure_unique(&merged, "merge")?;
    tracing::info!(%a, %b, into = %unified, rules = merged.len(), "merged categories");
    Ok(merged)
}

/// Detect rules that differ only in which candidate sits at `role`.
fn check_role(
    rules: &RuleSet,
    role: Endpoint,
    is_candidate: &impl Fn(&Category) -> bool,
) -> Result<(), ReconcileError> {
    let mut groups: BTreeMap<(&ConditionVector, &Category), Vec<&TransitionRule>> =
        BTreeMap::new();
    for rule in rules {
        let (at_role, other) = match role {
            Endpoint::Source => (&rule.source, &rule.target),
            Endpoint::Target => (&rule.target, &rule.source),
        };
        if is_candidate(at_role) {
            groups.entry((&rule.conditions, other)).or_default().push(rule);
        }
    }

    let conflicts: Vec<String> = groups
        .values()
        .filter(|g| g.len() > 1)
        .map(|g| render_group(g))
        .collect();
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::MergeConflict { role, conflicts })
    }
}
