//! # Category Vocabularies
//!
//! A `CategoryVocabulary` is the data-driven enumeration of the categories
//! one side of the reconciliation may use. Each entry carries a numeric
//! code, a stable identifier and a display alias.
//!
//! ## Invariants
//!
//! - Codes are unique within a vocabulary.
//! - Identifiers are unique within a vocabulary.
//! - A vocabulary is never empty.
//!
//! Legacy codes may have gaps or start anywhere. A vocabulary used to
//! canonicalize output must also be dense and zero-based, checked by
//! [`CategoryVocabulary::ensure_dense`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::VocabularyError;

/// One category in a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Numeric code used by tables written in this vocabulary.
    pub code: u32,
    /// Stable identifier, used as the category name inside rule sets.
    pub id: Category,
    /// Display name used by downstream consumers. Defaults to the identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl VocabularyEntry {
    /// Build an entry whose alias is its identifier.
    pub fn new(code: u32, id: Category) -> Self {
        Self {
            code,
            id,
            alias: None,
        }
    }

    /// Build an entry with an explicit display alias.
    pub fn with_alias(code: u32, id: Category, alias: impl Into<String>) -> Self {
        Self {
            code,
            id,
            alias: Some(alias.into()),
        }
    }

    /// The display alias, falling back to the identifier.
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// A validated, ordered enumeration of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryVocabulary {
    name: String,
    entries: Vec<VocabularyEntry>,
    by_code: BTreeMap<u32, usize>,
    by_id: BTreeMap<Category, usize>,
}

impl CategoryVocabulary {
    /// Validate entries and build the lookup indexes.
    pub fn new(
        name: impl Into<String>,
        entries: Vec<VocabularyEntry>,
    ) -> Result<Self, VocabularyError> {
        let name = name.into();
        if entries.is_empty() {
            return Err(VocabularyError::Empty(name));
        }

        let mut by_code = BTreeMap::new();
        let mut by_id = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            if by_code.insert(entry.code, idx).is_some() {
                return Err(VocabularyError::DuplicateCode {
                    vocabulary: name,
                    code: entry.code,
                });
            }
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(VocabularyError::DuplicateId {
                    vocabulary: name,
                    id: entry.id.clone(),
                });
            }
        }

        Ok(Self {
            name,
            entries,
            by_code,
            by_id,
        })
    }

    /// Vocabulary name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed vocabulary; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &Category> + '_ {
        self.entries.iter().map(|e| &e.id)
    }

    /// Look up an entry by numeric code.
    pub fn by_code(&self, code: u32) -> Option<&VocabularyEntry> {
        self.by_code.get(&code).map(|&idx| &self.entries[idx])
    }

    /// Look up an entry by identifier.
    pub fn get(&self, id: &Category) -> Option<&VocabularyEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Numeric code of an identifier.
    pub fn code_of(&self, id: &Category) -> Option<u32> {
        self.get(id).map(|e| e.code)
    }

    /// Whether the identifier belongs to this vocabulary.
    pub fn contains(&self, id: &Category) -> bool {
        self.by_id.contains_key(id)
    }

    /// Require codes to be exactly `0, 1, .., len - 1` in declaration order.
    pub fn ensure_dense(&self) -> Result<(), VocabularyError> {
        for (expected, entry) in (0u32..).zip(&self.entries) {
            if entry.code != expected {
                return Err(VocabularyError::NotDense {
                    vocabulary: self.name.clone(),
                    expected,
                    found: entry.code,
                });
            }
        }
        Ok(())
    }

    /// Identifiers of this vocabulary that are not in `covered`, in declaration order.
    pub fn ids_not_in<'a>(&'a self, covered: &HashSet<&Category>) -> Vec<&'a Category> {
        self.ids().filter(|id| !covered.contains(id)).collect()
    }
}

/// Built-in vocabularies for the Millington 2009 succession table and
/// the AgroSuccess model.
pub mod presets {
    use super::{CategoryVocabulary, VocabularyEntry};
    use crate::category::Category;
    use crate::error::VocabularyError;

    /// Names accepted by [`by_name`].
    pub const NAMES: &[&str] = &["millington_paper", "millington_thesis", "agrosuccess"];

    /// Resolve a preset by name.
    pub fn by_name(name: &str) -> Result<CategoryVocabulary, VocabularyError> {
        match name {
            "millington_paper" => millington_paper(),
            "millington_thesis" => millington_thesis(),
            "agrosuccess" => agrosuccess(),
            other => Err(VocabularyError::UnknownPreset(other.to_string())),
        }
    }

    /// Codes used by the long table in the supplementary material of
    /// Millington et al. (2009).
    ///
    /// These differ from the thesis numbering: pasture is 3 here and 5 in
    /// the thesis. Reading the supplementary table with thesis codes yields
    /// nonsense such as deciduous forest only transitioning to pasture.
    pub fn millington_paper() -> Result<CategoryVocabulary, VocabularyError> {
        build(
            "millington_paper",
            &[
                (1, "pine", None),
                (2, "transition_forest", None),
                (3, "pasture", None),
                (4, "deciduous", None),
                (5, "scrubland", None),
                (6, "holm_oak", None),
                (7, "holm_oak_w_pasture", None),
                (8, "cropland", None),
                (9, "water_quarry", None),
                (10, "urban", None),
                (11, "burnt", None),
            ],
        )
    }

    /// Codes from Table 4.1 of the Millington PhD thesis.
    pub fn millington_thesis() -> Result<CategoryVocabulary, VocabularyError> {
        build(
            "millington_thesis",
            &[
                (1, "pine", None),
                (2, "transition_forest", None),
                (3, "deciduous", None),
                (4, "holm_oak", None),
                (5, "pasture", None),
                (6, "holm_oak_w_pasture", None),
                (7, "cropland", None),
                (8, "scrubland", None),
                (9, "water_quarry", None),
                (10, "urban", None),
                (11, "burnt", None),
            ],
        )
    }

    /// Land-cover types of the AgroSuccess model. Aliases match the names
    /// used by the simulation itself.
    pub fn agrosuccess() -> Result<CategoryVocabulary, VocabularyError> {
        build(
            "agrosuccess",
            &[
                (0, "water_quarry", Some("WaterQuarry")),
                (1, "burnt", Some("Burnt")),
                (2, "wheat", Some("Wheat")),
                (3, "dal", Some("DAL")),
                (4, "shrubland", Some("Shrubland")),
                (5, "pine", Some("Pine")),
                (6, "trans_forest", Some("TransForest")),
                (7, "deciduous", Some("Deciduous")),
                (8, "oak", Some("Oak")),
                (9, "grassland", Some("Grassland")),
            ],
        )
    }

    fn build(
        name: &str,
        entries: &[(u32, &str, Option<&str>)],
    ) -> Result<CategoryVocabulary, VocabularyError> {
        let entries = entries
            .iter()
            .map(|&(code, id, alias)| {
                let id = Category::new(id)?;
                Ok(match alias {
                    Some(alias) => VocabularyEntry::with_alias(code, id, alias),
                    None => VocabularyEntry::new(code, id),
                })
            })
            .collect::<Result<Vec<_>, VocabularyError>>()?;
        CategoryVocabulary::new(name, entries)
    }
}
