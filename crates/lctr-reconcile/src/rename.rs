//! # Category Renamer
//!
//! Applies a one-to-one map from legacy identifiers to target identifiers
//! to both endpoints of every rule.
//!
//! ## Vocabulary drift check
//!
//! A map is only trusted together with two declared residual sets: the
//! legacy ids it deliberately leaves unmapped, and the target ids nothing
//! maps onto. Before any rule is rewritten both sets are recomputed from
//! the live vocabularies and compared exactly. If either vocabulary
//! changes without the map being updated, renaming stops with
//! `VocabularyMismatch` instead of silently leaving stale identifiers.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use lctr_core::{
    Category, CategoryVocabulary, ReconcileError, RuleSet, TransitionRule, VocabularySide,
};

use crate::duplicates::ensure_unique;

/// Legacy-to-target category map plus its declared residual sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryMap {
    /// One-to-one legacy → target mapping.
    pub map: BTreeMap<Category, Category>,
    /// Legacy ids intentionally absent from the map's domain.
    #[serde(default)]
    pub expected_unmapped_legacy: BTreeSet<Category>,
    /// Target ids intentionally absent from the map's image.
    #[serde(default)]
    pub expected_unmapped_target: BTreeSet<Category>,
}

/// The residual sets actually produced by a map, in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residuals {
    /// Legacy ids the map does not cover.
    pub unmapped_legacy: Vec<Category>,
    /// Target ids the map never produces.
    pub unmapped_target: Vec<Category>,
}

impl CategoryMap {
    /// Image of a legacy id, if mapped.
    pub fn get(&self, legacy: &Category) -> Option<&Category> {
        self.map.get(legacy)
    }

    /// Compute the residual sets against live vocabularies.
    pub fn residuals(
        &self,
        legacy: &CategoryVocabulary,
        target: &CategoryVocabulary,
    ) -> Residuals {
        let domain: HashSet<&Category> = self.map.keys().collect();
        let image: HashSet<&Category> = self.map.values().collect();
        Residuals {
            unmapped_legacy: legacy.ids_not_in(&domain).into_iter().cloned().collect(),
            unmapped_target: target.ids_not_in(&image).into_iter().cloned().collect(),
        }
    }

    /// Check the map against live vocabularies and the declared residuals.
    ///
    /// On the legacy side, map keys outside the legacy vocabulary count as
    /// unexpected. On the target side, images outside the target vocabulary
    /// and images hit by more than one key count as unexpected.
    pub fn validate(
        &self,
        legacy: &CategoryVocabulary,
        target: &CategoryVocabulary,
    ) -> Result<(), ReconcileError> {
        let residuals = self.residuals(legacy, target);

        let foreign_keys = self.map.keys().filter(|k| !legacy.contains(k));
        check_side(
            VocabularySide::Legacy,
            &residuals.unmapped_legacy,
            &self.expected_unmapped_legacy,
            foreign_keys,
        )?;

        let mut seen = HashSet::new();
        let repeated = self.map.values().filter(|v| !seen.insert(*v));
        let foreign_values = self.map.values().filter(|v| !target.contains(v));
        check_side(
            VocabularySide::Target,
            &residuals.unmapped_target,
            &self.expected_unmapped_target,
            foreign_values.chain(repeated),
        )
    }
}

fn check_side<'a>(
    side: VocabularySide,
    actual: &'a [Category],
    expected: &BTreeSet<Category>,
    invalid: impl Iterator<Item = &'a Category>,
) -> Result<(), ReconcileError> {
    let actual: BTreeSet<&Category> = actual.iter().collect();
    let mut unexpected: BTreeSet<&Category> = actual
        .iter()
        .copied()
        .filter(|c| !expected.contains(*c))
        .collect();
    unexpected.extend(invalid);
    let missing: Vec<Category> = expected
        .iter()
        .filter(|c| !actual.contains(c))
        .cloned()
        .collect();

    if unexpected.is_empty() && missing.is_empty() {
        return Ok(());
    }
    Err(ReconcileError::VocabularyMismatch {
        side,
        unexpected: unexpected.into_iter().cloned().collect(),
        missing,
    })
}

/// Validate `map`, then rewrite both endpoints of every rule through it.
///
/// Unmapped categories pass through unchanged; later stages remove,
/// expand or merge them.
pub fn rename(
    rules: &RuleSet,
    map: &CategoryMap,
    legacy: &CategoryVocabulary,
    target: &CategoryVocabulary,
) -> Result<RuleSet, ReconcileError> {
    map.validate(legacy, target)?;

    let renamed: RuleSet = rules
        .iter()
        .map(|rule| {
            let through = |c: &Category| map.get(c).unwrap_or(c).clone();
            TransitionRule {
                source: through(&rule.source),
                target: through(&rule.target),
                ..rule.clone()
            }
        })
        .collect();

    ensure_unique(&renamed, "rename")?;
    tracing::info!(rules = renamed.len(), mapped = map.map.len(), "renamed categories");
    Ok(renamed)
}
