//! Search field definitions.
//!
//! A field definition tells the indexer whether a metadata element is copied
//! into a searchable text field, a facet field, or both.

use serde::{Deserialize, Serialize};

/// Indexing settings of one metadata element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Vocabulary (element set) of the element.
    pub vocabulary: String,
    /// Element name.
    pub element: String,
    /// Stable key fragment used to build document field names.
    pub slug: String,
    /// Human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Copy values into the searchable text field.
    #[serde(default)]
    pub indexed: bool,
    /// Copy values into the facet field.
    #[serde(default)]
    pub facet: bool,
}

impl FieldDefinition {
    pub fn new(
        vocabulary: impl Into<String>,
        element: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            vocabulary: vocabulary.into(),
            element: element.into(),
            slug: slug.into(),
            label: None,
            indexed: false,
            facet: false,
        }
    }

    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn faceted(mut self, facet: bool) -> Self {
        self.facet = facet;
        self
    }

    /// Name of the searchable text field.
    pub fn index_key(&self) -> String {
        format!("{}_t", self.slug)
    }

    /// Name of the facet field.
    pub fn facet_key(&self) -> String {
        format!("{}_s", self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        let field = FieldDefinition::new("Dublin Core", "Title", "50")
            .indexed(true)
            .faceted(true);

        assert_eq!(field.index_key(), "50_t");
        assert_eq!(field.facet_key(), "50_s");
    }
}
