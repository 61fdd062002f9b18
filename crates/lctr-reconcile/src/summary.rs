//! Transition summary: which category pairs are connected at all, by how
//! many rules, and over what range of durations.

use std::collections::BTreeMap;

use serde::Serialize;

use lctr_core::{Category, RuleSet};

/// Aggregate over all rules sharing one `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionSummary {
    /// Source category.
    pub source: Category,
    /// Target category.
    pub target: Category,
    /// Number of rules (condition combinations) for the pair.
    pub rules: usize,
    /// Shortest duration among those rules.
    pub min_duration: u32,
    /// Longest duration among those rules.
    pub max_duration: u32,
}

/// Summarise non-reflexive transitions, ordered by `(source, target)` name.
pub fn summarise(rules: &RuleSet) -> Vec<TransitionSummary> {
    let mut pairs: BTreeMap<(&Category, &Category), TransitionSummary> = BTreeMap::new();
    for rule in rules.iter().filter(|r| !r.is_reflexive()) {
        pairs
            .entry((&rule.source, &rule.target))
            .and_modify(|s| {
                s.rules += 1;
                s.min_duration = s.min_duration.min(rule.duration);
                s.max_duration = s.max_duration.max(rule.duration);
            })
            .or_insert_with(|| TransitionSummary {
                source: rule.source.clone(),
                target: rule.target.clone(),
                rules: 1,
                min_duration: rule.duration,
                max_duration: rule.duration,
            });
    }
    pairs.into_values().collect()
}
