//! # Reconciliation Configuration
//!
//! Declarative description of one reconciliation: which vocabularies and
//! condition schema to use, how the table's columns are named, and the
//! rename map, removal list, expansions and merges to apply.
//!
//! Configuration is YAML. Vocabularies and the condition schema are either
//! a preset name or an inline definition:
//!
//! ```yaml
//! legacy_vocabulary: millington_paper
//! target_vocabulary:
//!   name: small
//!   entries:
//!     - {code: 0, id: burnt, alias: Burnt}
//!     - {code: 1, id: pine}
//! conditions: millington
//! rename:
//!   map: {pine: pine, burnt: burnt}
//!   expected_unmapped_legacy: [pasture]
//! remove: [urban]
//! expand:
//!   - {category: cropland, into: [wheat, dal]}
//! merge:
//!   - {categories: [pasture, scrubland], into: shrubland}
//! ```
//!
//! [`ReconcileConfig::build`] validates everything eagerly against the
//! live vocabularies and returns a ready-to-run [`Pipeline`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lctr_core::condition::presets as schema_presets;
use lctr_core::vocabulary::presets as vocabulary_presets;
use lctr_core::{
    Category, CategoryVocabulary, ConditionField, ConditionSchema, ReconcileError, SchemaError,
    VocabularyEntry, VocabularyError,
};

use crate::pipeline::Pipeline;
use crate::rename::CategoryMap;

/// The bundled AgroSuccess configuration.
pub const AGROSUCCESS_PRESET: &str = include_str!("../presets/agrosuccess.yaml");

/// Error while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML document is malformed or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A vocabulary could not be built.
    #[error("vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    /// The condition schema could not be built.
    #[error("condition schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The category map disagrees with the vocabularies.
    #[error("category map error: {0}")]
    CategoryMap(#[from] ReconcileError),

    /// A removal, expansion or merge names a category that cannot exist at
    /// that point of the pipeline.
    #[error("{context}: unknown category {category}")]
    UnknownCategory {
        /// Which configuration entry referenced the category.
        context: String,
        /// The unknown category.
        category: Category,
    },

    /// A merge names the same category twice.
    #[error("merge into {into}: cannot merge {category} with itself")]
    SelfMerge {
        /// The repeated category.
        category: Category,
        /// Unified name of the merge.
        into: Category,
    },

    /// Two columns of the table layout share a name.
    #[error("table layout: column {0:?} is used twice")]
    DuplicateColumn(String),
}

/// A vocabulary given by preset name or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VocabularySource {
    /// One of [`lctr_core::vocabulary::presets::NAMES`].
    Preset(String),
    /// Inline definition.
    Inline {
        /// Vocabulary name for diagnostics.
        name: String,
        /// Entries in declaration order.
        entries: Vec<VocabularyEntry>,
    },
}

impl VocabularySource {
    /// Build the vocabulary.
    pub fn resolve(&self) -> Result<CategoryVocabulary, VocabularyError> {
        match self {
            Self::Preset(name) => vocabulary_presets::by_name(name),
            Self::Inline { name, entries } => CategoryVocabulary::new(name.clone(), entries.clone()),
        }
    }
}

/// A condition schema given by preset name or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    /// One of [`lctr_core::condition::presets::NAMES`].
    Preset(String),
    /// Inline field list.
    Inline(Vec<ConditionField>),
}

impl SchemaSource {
    /// Build the schema.
    pub fn resolve(&self) -> Result<ConditionSchema, SchemaError> {
        match self {
            Self::Preset(name) => schema_presets::by_name(name),
            Self::Inline(fields) => ConditionSchema::new(fields.clone()),
        }
    }
}

impl Default for SchemaSource {
    fn default() -> Self {
        Self::Preset("millington".to_string())
    }
}

/// Column names of the input and output tables.
///
/// Condition columns are named by the condition schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableLayout {
    /// Source category column.
    pub source_column: String,
    /// Target category column.
    pub target_column: String,
    /// Duration column.
    pub duration_column: String,
    /// Transition id column of the output table.
    pub id_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            source_column: "start".to_string(),
            target_column: "delta_D".to_string(),
            duration_column: "delta_T".to_string(),
            id_column: "transID".to_string(),
        }
    }
}

/// How categories are named in the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNames {
    /// Stable identifiers, e.g. `trans_forest`.
    #[default]
    Identifier,
    /// Vocabulary display aliases, e.g. `TransForest`.
    Alias,
}

/// Replace one source-only category with several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpansionSpec {
    /// Category to replace.
    pub category: Category,
    /// Replacement categories.
    pub into: Vec<Category>,
}

/// Unify two categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeSpec {
    /// The two categories to unify.
    pub categories: [Category; 2],
    /// Unified name.
    pub into: Category,
}

/// Complete description of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Vocabulary of the input table.
    pub legacy_vocabulary: VocabularySource,
    /// Vocabulary of the output table; must be dense and zero-based.
    pub target_vocabulary: VocabularySource,
    /// Condition columns.
    #[serde(default)]
    pub conditions: SchemaSource,
    /// Column names.
    #[serde(default)]
    pub table: TableLayout,
    /// Output naming.
    #[serde(default)]
    pub output_names: OutputNames,
    /// Legacy-to-target map and declared residuals.
    pub rename: CategoryMap,
    /// Categories to remove, in order.
    #[serde(default)]
    pub remove: Vec<Category>,
    /// Expansions, applied in order.
    #[serde(default)]
    pub expand: Vec<ExpansionSpec>,
    /// Merges, applied in order after all expansions.
    #[serde(default)]
    pub merge: Vec<MergeSpec>,
}

impl ReconcileConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The bundled Millington 2009 → AgroSuccess configuration.
    pub fn agrosuccess() -> Result<Self, ConfigError> {
        Self::from_yaml_str(AGROSUCCESS_PRESET)
    }

    /// Validate against the vocabularies and build the pipeline.
    ///
    /// Checks, in order: both vocabularies and the schema build, the target
    /// vocabulary is dense, column names are distinct, the category map
    /// matches its declared residuals, and every removal, expansion and
    /// merge names categories that exist when that step runs.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        let legacy = self.legacy_vocabulary.resolve()?;
        let target = self.target_vocabulary.resolve()?;
        target.ensure_dense()?;
        let schema = self.conditions.resolve()?;

        let mut columns = BTreeSet::new();
        let layout_columns = [
            &self.table.source_column,
            &self.table.target_column,
            &self.table.duration_column,
            &self.table.id_column,
        ];
        for column in layout_columns
            .into_iter()
            .map(String::as_str)
            .chain(schema.names())
        {
            if !columns.insert(column) {
                return Err(ConfigError::DuplicateColumn(column.to_string()));
            }
        }

        self.rename.validate(&legacy, &target)?;

        // Categories present after renaming: every target id plus the
        // legacy ids the map leaves alone.
        let working: BTreeSet<&Category> = target
            .ids()
            .chain(self.rename.expected_unmapped_legacy.iter())
            .collect();
        let in_working = |c: &Category| working.contains(c);
        let in_target = |c: &Category| target.contains(c);

        for category in &self.remove {
            require("remove", category, in_working)?;
        }
        for spec in &self.expand {
            let context = format!("expand {}", spec.category);
            require(&context, &spec.category, in_working)?;
            for replacement in &spec.into {
                require(&context, replacement, in_target)?;
            }
        }
        for spec in &self.merge {
            let [a, b] = &spec.categories;
            if a == b {
                return Err(ConfigError::SelfMerge {
                    category: a.clone(),
                    into: spec.into.clone(),
                });
            }
            let context = format!("merge into {}", spec.into);
            require(&context, a, in_working)?;
            require(&context, b, in_working)?;
            require(&context, &spec.into, in_target)?;
        }

        tracing::debug!(
            legacy = legacy.name(),
            target = target.name(),
            removals = self.remove.len(),
            expansions = self.expand.len(),
            merges = self.merge.len(),
            "configuration validated"
        );

        Ok(Pipeline {
            legacy,
            target,
            schema,
            layout: self.table,
            output_names: self.output_names,
            category_map: self.rename,
            remove: self.remove,
            expand: self.expand,
            merge: self.merge,
        })
    }
}

fn require(
    context: &str,
    category: &Category,
    known: impl Fn(&Category) -> bool,
) -> Result<(), ConfigError> {
    if known(category) {
        Ok(())
    } else {
        Err(ConfigError::UnknownCategory {
            context: context.to_string(),
            category: category.clone(),
        })
    }
}
