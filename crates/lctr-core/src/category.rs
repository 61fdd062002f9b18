//! # Category Identifiers
//!
//! A `Category` is an opaque token naming one land-cover state. Tokens are
//! validated once at construction (non-empty, no whitespace) so every later
//! comparison is plain string equality.

use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;

/// Identifier of a land-cover category, e.g. `holm_oak` or `shrubland`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validate and wrap a category token.
    pub fn new(token: impl Into<String>) -> Result<Self, VocabularyError> {
        let token = token.into();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(VocabularyError::InvalidCategory(token));
        }
        Ok(Self(token))
    }

    /// Access the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Category {
    type Error = VocabularyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
