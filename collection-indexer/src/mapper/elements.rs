//! Schema-driven mapping of metadata elements.

use std::collections::HashMap;

use collection_indexer_repository::{RecordRepository, RepositoryError};
use collection_indexer_shared::{Document, FieldDefinition, Record};

/// Field definitions keyed by `(vocabulary, element)`.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: HashMap<(String, String), FieldDefinition>,
}

impl FieldCatalog {
    /// Build a catalog; a later definition of the same element replaces an
    /// earlier one.
    pub fn new(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let fields = definitions
            .into_iter()
            .map(|def| ((def.vocabulary.clone(), def.element.clone()), def))
            .collect();
        Self { fields }
    }

    pub fn from_repository(repo: &dyn RecordRepository) -> Result<Self, RepositoryError> {
        Ok(Self::new(repo.field_definitions()?))
    }

    pub fn lookup(&self, vocabulary: &str, element: &str) -> Option<&FieldDefinition> {
        self.fields
            .get(&(vocabulary.to_string(), element.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy every catalogued metadata value of `record` into `doc`.
    ///
    /// Elements without a definition are skipped.
    pub fn apply(&self, record: &Record, doc: &mut Document) {
        for entry in &record.metadata {
            let Some(field) = self.lookup(&entry.vocabulary, &entry.field) else {
                continue;
            };
            if field.indexed {
                doc.push_multi(field.index_key(), entry.text.as_str());
            }
            if field.facet {
                doc.push_multi(field.facet_key(), entry.text.as_str());
            }
        }
    }
}
