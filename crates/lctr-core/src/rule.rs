//! # Transition Rules and Rule Sets
//!
//! A [`TransitionRule`] says: a cell in `source` becomes `target` after
//! `duration` years when the environment matches `conditions`.
//!
//! ## Identity
//!
//! Two rules are the same rule when they share `(source, target,
//! conditions)`. The duration is a payload and takes no part in equality
//! or hashing. Within one [`RuleSet`] no two rules may share a key; the
//! reconciliation stages re-check this after every step that can merge
//! identifiers.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::category::Category;
use crate::condition::ConditionVector;

/// A rule as read from the legacy table: every field still a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule {
    /// Legacy code of the source category.
    pub source: u32,
    /// Legacy code of the target category.
    pub target: u32,
    /// Condition codes in schema order.
    pub conditions: Vec<u32>,
    /// Years until the transition happens.
    pub duration: u32,
}

/// A translated state-transition rule.
#[derive(Debug, Clone)]
pub struct TransitionRule {
    /// Category the transition starts from.
    pub source: Category,
    /// Category the transition ends in.
    pub target: Category,
    /// Environmental conditions under which the transition applies.
    pub conditions: ConditionVector,
    /// Years until the transition happens. Carried through unchanged.
    pub duration: u32,
}

/// Borrowed identity of a rule.
pub type RuleKey<'a> = (&'a Category, &'a Category, &'a ConditionVector);

impl TransitionRule {
    /// Build a rule.
    pub fn new(
        source: Category,
        target: Category,
        conditions: ConditionVector,
        duration: u32,
    ) -> Self {
        Self {
            source,
            target,
            conditions,
            duration,
        }
    }

    /// The rule's identity.
    pub fn key(&self) -> RuleKey<'_> {
        (&self.source, &self.target, &self.conditions)
    }

    /// Whether the rule encodes "no transition".
    pub fn is_reflexive(&self) -> bool {
        self.source == self.target
    }

    /// Whether `category` is either endpoint.
    pub fn touches(&self, category: &Category) -> bool {
        &self.source == category || &self.target == category
    }
}

impl PartialEq for TransitionRule {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TransitionRule {}

impl Hash for TransitionRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} {} [{}y]",
            self.source, self.target, self.conditions, self.duration
        )
    }
}

/// An ordered collection of transition rules.
///
/// Stages take a `&RuleSet` and return a new one; the input is never
/// mutated so callers keep the last known-good set when a stage fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<TransitionRule>,
}

impl RuleSet {
    /// Wrap a list of rules.
    pub fn new(rules: Vec<TransitionRule>) -> Self {
        Self { rules }
    }

    /// Rules in their current order.
    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Consume the set and return the rules.
    pub fn into_rules(self) -> Vec<TransitionRule> {
        self.rules
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, TransitionRule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// New set holding the rules that satisfy `keep`, in order.
    pub fn filtered(&self, mut keep: impl FnMut(&TransitionRule) -> bool) -> Self {
        Self::new(self.rules.iter().filter(|r| keep(r)).cloned().collect())
    }

    /// Every category used as a source or target.
    pub fn categories(&self) -> BTreeSet<&Category> {
        self.rules
            .iter()
            .flat_map(|r| [&r.source, &r.target])
            .collect()
    }
}

impl From<Vec<TransitionRule>> for RuleSet {
    fn from(rules: Vec<TransitionRule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<TransitionRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = TransitionRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a TransitionRule;
    type IntoIter = std::slice::Iter<'a, TransitionRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str, t: &str, c: &[u32], d: u32) -> TransitionRule {
        TransitionRule::new(
            Category::new(s).unwrap(),
            Category::new(t).unwrap(),
            ConditionVector::from_codes(c),
            d,
        )
    }

    #[test]
    fn duration_is_not_part_of_identity() {
        assert_eq!(rule("a", "b", &[0, 1], 5), rule("a", "b", &[0, 1], 40));
        assert_ne!(rule("a", "b", &[0, 1], 5), rule("a", "b", &[1, 1], 5));
        assert_ne!(rule("a", "b", &[0], 5), rule("b", "a", &[0], 5));
    }

    #[test]
    fn hash_agrees_with_eq() {
        let mut set = std::collections::HashSet::new();
        set.insert(rule("a", "b", &[0], 5));
        assert!(!set.insert(rule("a", "b", &[0], 9)));
        assert!(set.insert(rule("a", "c", &[0], 5)));
    }

    #[test]
    fn reflexive_and_touches() {
        let r = rule("a", "a", &[0], 0);
        assert!(r.is_reflexive());
        assert!(r.touches(&Category::new("a").unwrap()));
        assert!(!rule("a", "b", &[0], 1).is_reflexive());
    }

    #[test]
    fn filtered_leaves_input_untouched() {
        let set = RuleSet::new(vec![rule("a", "b", &[0], 1), rule("b", "b", &[0], 0)]);
        let kept = set.filtered(|r| !r.is_reflexive());
        assert_eq!(kept.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn categories_collects_both_endpoints() {
        let set: RuleSet = vec![rule("a", "b", &[0], 1), rule("c", "b", &[0], 1)]
            .into_iter()
            .collect();
        let names: Vec<_> = set.categories().into_iter().map(Category::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn display_includes_duration() {
        assert_eq!(rule("a", "b", &[0, 2], 15).to_string(), "a -> b (0, 2) [15y]");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(rule: &TransitionRule) -> u64 {
            let mut hasher = DefaultHasher::new();
            rule.hash(&mut hasher);
            hasher.finish()
        }

        proptest! {
            #[test]
            fn duration_never_affects_identity(
                codes in prop::collection::vec(0u32..3, 0..4),
                d1 in 0u32..100,
                d2 in 0u32..100,
            ) {
                let x = rule("pine", "oak", &codes, d1);
                let y = rule("pine", "oak", &codes, d2);
                prop_assert_eq!(&x, &y);
                prop_assert_eq!(hash_of(&x), hash_of(&y));
            }
        }
    }
}
