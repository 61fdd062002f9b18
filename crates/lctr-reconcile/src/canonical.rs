//! # Canonicalizer
//!
//! Fixes the externally visible order and identifiers of the output table.
//!
//! ## Ordering contract
//!
//! Rules sort by `(source_code, target_code, conditions)`, where the codes
//! come from the target vocabulary and each condition compares by its
//! domain code, left to right. Rows then receive a dense zero-based
//! `transition_id`. Downstream consumers join on these ids, so the order
//! must not depend on the order rules arrived in.
//!
//! Conditions order by code, not by label text: `water` sorts xeric,
//! mesic, hydric. Tables sorted on the rendered labels number their rows
//! differently, so diff against them by rule, not by `transition_id`.
//!
//! The target vocabulary must be dense and zero-based; configuration
//! loading checks this before the pipeline is built.

use lctr_core::{Category, CategoryVocabulary, ReconcileError, RuleSet, TransitionRule};

/// One row of the canonical output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRule {
    /// Dense row identifier in sort order.
    pub transition_id: usize,
    /// Target-vocabulary code of the source category.
    pub source_code: u32,
    /// Target-vocabulary code of the target category.
    pub target_code: u32,
    /// The rule itself.
    pub rule: TransitionRule,
}

/// The sorted, reindexed output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    rows: Vec<CanonicalRule>,
}

impl CanonicalTable {
    /// Rows in canonical order.
    pub fn rows(&self) -> &[CanonicalRule] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rules in canonical order, without ids.
    pub fn to_rule_set(&self) -> RuleSet {
        self.rows.iter().map(|row| row.rule.clone()).collect()
    }
}

/// Sort `rules` into canonical order and assign transition ids.
///
/// Fails with `UnknownCategory` if a rule still refers to a category the
/// target vocabulary does not define.
pub fn canonicalize(
    rules: &RuleSet,
    target: &CategoryVocabulary,
) -> Result<CanonicalTable, ReconcileError> {
    let code_of = |rule: &TransitionRule, endpoint: &Category| {
        target
            .code_of(endpoint)
            .ok_or_else(|| ReconcileError::UnknownCategory {
                category: endpoint.clone(),
                rule: rule.to_string(),
            })
    };

    let mut rows = rules
        .iter()
        .map(|rule| {
            Ok(CanonicalRule {
                transition_id: 0,
                source_code: code_of(rule, &rule.source)?,
                target_code: code_of(rule, &rule.target)?,
                rule: rule.clone(),
            })
        })
        .collect::<Result<Vec<_>, ReconcileError>>()?;

    rows.sort_by(|x, y| {
        (x.source_code, x.target_code, &x.rule.conditions).cmp(&(
            y.source_code,
            y.target_code,
            &y.rule.conditions,
        ))
    });
    for (id, row) in rows.iter_mut().enumerate() {
        row.transition_id = id;
    }

    tracing::info!(rules = rows.len(), vocabulary = target.name(), "canonicalized table");
    Ok(CanonicalTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{cat, rule, vocab};
    use lctr_core::{ConditionValue, ConditionVector};

    #[test]
    fn sorts_by_source_target_then_conditions() {
        let target = vocab("t", &["a", "b"]);
        let rules = RuleSet::new(vec![
            rule("b", "a", &[1, 0], 1),
            rule("a", "b", &[0, 0], 2),
            rule("a", "a", &[0, 1], 3),
        ]);
        let table = canonicalize(&rules, &target).unwrap();
        let got: Vec<_> = table
            .rows()
            .iter()
            .map(|r| (r.transition_id, r.rule.clone()))
            .collect();
        assert_eq!(
            got,
            vec![
                (0, rule("a", "a", &[0, 1], 0)),
                (1, rule("a", "b", &[0, 0], 0)),
                (2, rule("b", "a", &[1, 0], 0)),
            ]
        );
        assert_eq!(table.rows()[2].source_code, 1);
        assert_eq!(table.rows()[2].rule.duration, 1);
    }

    #[test]
    fn uses_vocabulary_codes_not_names() {
        // zeta has code 0, so it sorts before alpha.
        let target = vocab("t", &["zeta", "alpha"]);
        let rules = RuleSet::new(vec![rule("alpha", "zeta", &[0], 1), rule("zeta", "alpha", &[0], 1)]);
        let table = canonicalize(&rules, &target).unwrap();
        assert_eq!(table.rows()[0].rule.source, cat("zeta"));
    }

    #[test]
    fn conditions_order_by_code_not_label() {
        let target = vocab("t", &["a", "b"]);
        let water = |code, label: &str| {
            let mut r = rule("a", "b", &[], 1);
            r.conditions = ConditionVector(vec![ConditionValue::text(code, label)]);
            r
        };
        let rules = RuleSet::new(vec![water(2, "hydric"), water(1, "mesic"), water(0, "xeric")]);
        let table = canonicalize(&rules, &target).unwrap();
        let labels: Vec<String> = table
            .rows()
            .iter()
            .map(|r| r.rule.conditions.to_string())
            .collect();
        assert_eq!(labels, ["(xeric)", "(mesic)", "(hydric)"]);
        assert_eq!(table.rows()[1].transition_id, 1);
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let target = vocab("t", &["a", "b", "c"]);
        let forward = RuleSet::new(vec![
            rule("c", "a", &[2], 1),
            rule("a", "c", &[1], 1),
            rule("a", "c", &[0], 1),
            rule("b", "a", &[0], 1),
        ]);
        let reversed: RuleSet = forward.rules().iter().rev().cloned().collect();
        assert_eq!(
            canonicalize(&forward, &target).unwrap(),
            canonicalize(&reversed, &target).unwrap()
        );
    }

    #[test]
    fn stale_category_is_reported() {
        let target = vocab("t", &["a", "b"]);
        let rules = RuleSet::new(vec![rule("a", "pasture", &[0], 1)]);
        let err = canonicalize(&rules, &target).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnknownCategory {
                category: cat("pasture"),
                rule: "a -> pasture (0) [1y]".into(),
            }
        );
    }

    #[test]
    fn to_rule_set_preserves_canonical_order() {
        let target = vocab("t", &["a", "b"]);
        let rules = RuleSet::new(vec![rule("b", "a", &[0], 1), rule("a", "b", &[0], 1)]);
        let set = canonicalize(&rules, &target).unwrap().to_rule_set();
        assert_eq!(set.rules()[0].source, cat("a"));
    }
}
