//! Duplicate invariant: no two rules share `(source, target, conditions)`.

use std::collections::BTreeMap;

use lctr_core::{ReconcileError, RuleKey, RuleSet, TransitionRule};

/// Groups of two or more rules sharing a key, ordered by key.
pub fn duplicate_groups(rules: &RuleSet) -> Vec<Vec<&TransitionRule>> {
    let mut by_key: BTreeMap<RuleKey<'_>, Vec<&TransitionRule>> = BTreeMap::new();
    for rule in rules {
        by_key.entry(rule.key()).or_default().push(rule);
    }
    by_key.into_values().filter(|g| g.len() > 1).collect()
}

/// Fail with `DuplicateRule` if any key occurs twice.
pub fn ensure_unique(rules: &RuleSet, stage: &'static str) -> Result<(), ReconcileError> {
    let groups = duplicate_groups(rules);
    if groups.is_empty() {
        return Ok(());
    }
    Err(ReconcileError::DuplicateRule {
        stage,
        duplicates: groups.iter().map(|g| render_group(g)).collect(),
    })
}

/// Render a group of rules as `r1 | r2 | ...`.
pub(crate) fn render_group(group: &[&TransitionRule]) -> String {
    group
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::rule;

    #[test]
    fn unique_set_passes() {
        let rules = RuleSet::new(vec![rule("a", "b", &[0], 1), rule("a", "b", &[1], 1)]);
        assert!(ensure_unique(&rules, "test").is_ok());
        assert!(duplicate_groups(&rules).is_empty());
    }

    #[test]
    fn duplicates_ignore_duration() {
        let rules = RuleSet::new(vec![
            rule("a", "b", &[0], 1),
            rule("c", "d", &[0], 1),
            rule("a", "b", &[0], 7),
        ]);
        let err = ensure_unique(&rules, "merge").unwrap_err();
        match err {
            ReconcileError::DuplicateRule { stage, duplicates } => {
                assert_eq!(stage, "merge");
                assert_eq!(duplicates, vec!["a -> b (0) [1y] | a -> b (0) [7y]"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
