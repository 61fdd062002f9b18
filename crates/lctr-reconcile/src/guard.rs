//! # Exclusivity Guard
//!
//! Before a category's rules are deleted, check that no other category
//! would become unreachable. The check runs on the directed graph of
//! distinct `(source, target)` pairs with self-loops removed: `category`
//! is an exclusive source of `T` when `category -> T` exists and no other
//! category has an edge into `T`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use lctr_core::{Category, RuleSet};

/// Outcome of the exclusivity check for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusivityReport {
    /// Category that was checked.
    pub category: Category,
    /// Whether any rule starts at `category`.
    pub has_outgoing: bool,
    /// Categories only `category` transitions into, in name order.
    pub orphaned: Vec<Category>,
}

impl ExclusivityReport {
    /// True when removing the category would orphan at least one other.
    pub fn is_sole_source(&self) -> bool {
        !self.orphaned.is_empty()
    }
}

/// Compute which categories only `category` transitions into.
///
/// Emits a warning (and reports nothing at risk) when `category` is not
/// the source of any rule.
pub fn exclusivity(rules: &RuleSet, category: &Category) -> ExclusivityReport {
    let has_outgoing = rules.iter().any(|r| &r.source == category);
    if !has_outgoing {
        tracing::warn!(%category, "no rule starts at this category");
        return ExclusivityReport {
            category: category.clone(),
            has_outgoing,
            orphaned: Vec::new(),
        };
    }

    let mut sources_of: BTreeMap<&Category, BTreeSet<&Category>> = BTreeMap::new();
    for rule in rules.iter().filter(|r| !r.is_reflexive()) {
        sources_of.entry(&rule.target).or_default().insert(&rule.source);
    }

    let orphaned: Vec<Category> = sources_of
        .iter()
        .filter(|(_, sources)| sources.contains(category))
        .filter(|(_, sources)| sources.iter().all(|s| *s == category))
        .map(|(target, _)| Category::clone(target))
        .collect();

    if !orphaned.is_empty() {
        tracing::info!(
            %category,
            orphaned = ?orphaned.iter().map(Category::as_str).collect::<Vec<_>>(),
            "category is the only source of other categories"
        );
    }

    ExclusivityReport {
        category: category.clone(),
        has_outgoing,
        orphaned,
    }
}

/// True when `category` is the only source of at least one other category.
pub fn is_sole_source(rules: &RuleSet, category: &Category) -> bool {
    exclusivity(rules, category).is_sole_source()
}
