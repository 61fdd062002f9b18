//! # Condition Schema
//!
//! The environmental conditions attached to every transition rule form a
//! fixed-arity vector. Each position has its own small finite domain
//! (binary aspect, ternary soil moisture, seed presence flags, ...).
//!
//! A [`ConditionValue`] keeps both the domain code and the translated
//! label. Values order by code, so a [`ConditionVector`] orders
//! lexicographically by the natural order of each field's domain,
//! left to right in declaration order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// How a field's value names are post-processed on translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Names become lower-case text labels.
    #[default]
    Label,
    /// Names `FALSE`/`TRUE` become booleans.
    Flag,
}

/// One code/name pair of a condition domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainValue {
    /// Code used in raw tables.
    pub code: u32,
    /// Enumeration name, e.g. `XERIC` or `TRUE`.
    pub name: String,
}

/// A named condition column and its domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionField {
    /// Column name in input and output tables.
    pub name: String,
    /// Post-processing applied on translation.
    #[serde(default)]
    pub kind: ConditionKind,
    /// The field's domain in natural order.
    pub values: Vec<DomainValue>,
}

impl ConditionField {
    /// Enumeration name for a code.
    pub fn name_of(&self, code: u32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.code == code)
            .map(|v| v.name.as_str())
    }
}

/// Ordered, validated list of condition fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSchema {
    fields: Vec<ConditionField>,
}

impl ConditionSchema {
    /// Validate field names and domains.
    pub fn new(fields: Vec<ConditionField>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut names = BTreeSet::new();
        for field in &fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if field.values.is_empty() {
                return Err(SchemaError::EmptyDomain(field.name.clone()));
            }
            let mut codes = BTreeSet::new();
            for value in &field.values {
                if !codes.insert(value.code) {
                    return Err(SchemaError::DuplicateCode {
                        field: field.name.clone(),
                        code: value.code,
                    });
                }
            }
            if field.kind == ConditionKind::Flag
                && (field.values.len() != 2
                    || field.name_of(0) != Some("FALSE")
                    || field.name_of(1) != Some("TRUE"))
            {
                return Err(SchemaError::InvalidFlag(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[ConditionField] {
        &self.fields
    }

    /// Number of condition fields (the arity of every condition vector).
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Translated representation of a condition value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionLabel {
    /// Lower-case text label.
    Text(String),
    /// Boolean flag.
    Flag(bool),
}

impl std::fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(true) => f.write_str("True"),
            Self::Flag(false) => f.write_str("False"),
        }
    }
}

/// A condition value: its domain code and its label.
///
/// Field order matters: the derived ordering compares codes first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConditionValue {
    /// Code in the field's domain; defines the ordering.
    pub code: u32,
    /// Translated label.
    pub label: ConditionLabel,
}

impl ConditionValue {
    /// Text-labelled value.
    pub fn text(code: u32, label: impl Into<String>) -> Self {
        Self {
            code,
            label: ConditionLabel::Text(label.into()),
        }
    }

    /// Flag value.
    pub fn flag(code: u32, value: bool) -> Self {
        Self {
            code,
            label: ConditionLabel::Flag(value),
        }
    }
}

impl std::fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.label.fmt(f)
    }
}

/// The ordered tuple of condition values of one rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConditionVector(pub Vec<ConditionValue>);

impl ConditionVector {
    /// Build a vector whose labels are the codes themselves. Useful when the
    /// domain names are irrelevant.
    pub fn from_codes(codes: &[u32]) -> Self {
        Self(
            codes
                .iter()
                .map(|&code| ConditionValue::text(code, code.to_string()))
                .collect(),
        )
    }

    /// Values in field order.
    pub fn values(&self) -> &[ConditionValue] {
        &self.0
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the vector has no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ConditionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            value.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// Built-in condition schemas.
pub mod presets {
    use super::{ConditionField, ConditionKind, ConditionSchema, DomainValue};
    use crate::error::SchemaError;

    /// Names accepted by [`by_name`].
    pub const NAMES: &[&str] = &["millington"];

    /// Resolve a preset by name.
    pub fn by_name(name: &str) -> Result<ConditionSchema, SchemaError> {
        match name {
            "millington" => millington(),
            other => Err(SchemaError::UnknownPreset(other.to_string())),
        }
    }

    /// The six environmental conditions of the Millington et al. (2009)
    /// succession table, in table column order.
    pub fn millington() -> Result<ConditionSchema, SchemaError> {
        ConditionSchema::new(vec![
            field("succession", ConditionKind::Label, &["REGENERATION", "SECONDARY"]),
            field("aspect", ConditionKind::Label, &["NORTH", "SOUTH"]),
            field("pine", ConditionKind::Flag, &["FALSE", "TRUE"]),
            field("oak", ConditionKind::Flag, &["FALSE", "TRUE"]),
            field("deciduous", ConditionKind::Flag, &["FALSE", "TRUE"]),
            field("water", ConditionKind::Label, &["XERIC", "MESIC", "HYDRIC"]),
        ])
    }

    fn field(name: &str, kind: ConditionKind, names: &[&str]) -> ConditionField {
        ConditionField {
            name: name.to_string(),
            kind,
            values: (0u32..)
                .zip(names)
                .map(|(code, name)| DomainValue {
                    code,
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}
