//! # Reflexive Rule Filter
//!
//! The legacy table encodes "these conditions cause no transition" as a
//! rule from a state to itself with a zero duration. The target model
//! represents the absence of a transition by the absence of a rule, so
//! these rows are dropped.

use lctr_core::RuleSet;

/// Remove every rule whose source equals its target.
pub fn drop_reflexive(rules: &RuleSet) -> RuleSet {
    let out = rules.filtered(|r| !r.is_reflexive());
    tracing::info!(dropped = rules.len() - out.len(), rules = out.len(), "dropped reflexive rules");
    out
}
