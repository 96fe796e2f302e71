//! Document mapping of addon-governed records.

use collection_indexer_repository::{ListQuery, RecordRepository};
use collection_indexer_shared::{Document, Record};
use tracing::{debug, instrument};

use crate::addons::{is_indexable, AddonConfig, FieldConfig};
use crate::errors::MappingError;
use crate::uri::UriResolver;

/// Maps records of addon tables into documents, field by field as their
/// addon declares.
#[derive(Debug, Clone)]
pub struct AddonMapper {
    uri: UriResolver,
}

impl AddonMapper {
    pub fn new(uri: UriResolver) -> Self {
        Self { uri }
    }

    pub fn map(
        &self,
        record: &Record,
        addon: &AddonConfig,
        repo: &dyn RecordRepository,
    ) -> Result<Document, MappingError> {
        let mut doc = Document::for_record(addon.result_type(), &addon.table, record.id);
        doc.url = Some(self.uri.resolve(record)?);
        doc.public = Some(match &addon.flag {
            Some(flag) => record.column_truthy(flag),
            None => record.public,
        });

        for field in &addon.fields {
            let values = field_values(record, field, repo)?;

            if addon.title.as_deref() == Some(field.name.as_str()) {
                doc.title = values.first().cloned();
            }
            for value in values {
                if field.indexed {
                    doc.push_multi(field.index_key(), value.as_str());
                }
                if field.facet {
                    doc.push_multi(field.facet_key(), value);
                }
            }
        }

        if addon.tagged {
            for tag in &record.tags {
                doc.push_multi("tag", tag.as_str());
            }
        }

        Ok(doc)
    }

    /// Map every indexable record of every addon.
    ///
    /// Addons are walked in registration order, records in listing order.
    #[instrument(skip_all, fields(addons = addons.len()))]
    pub fn map_all(
        &self,
        addons: &[AddonConfig],
        repo: &dyn RecordRepository,
    ) -> Result<Vec<Document>, MappingError> {
        let mut docs = Vec::new();
        for addon in addons {
            let records = repo.list(&addon.table, &ListQuery::all())?;
            let before = docs.len();
            for record in records.iter().filter(|r| is_indexable(r, addon)) {
                docs.push(self.map(record, addon, repo)?);
            }
            debug!(
                table = %addon.table,
                records = records.len(),
                documents = docs.len() - before,
                "Mapped addon records"
            );
        }
        Ok(docs)
    }
}

/// Values of one addon field.
///
/// A remote field reads column `name` of every record of the remote table
/// whose `key` column points at `record`.
fn field_values(
    record: &Record,
    field: &FieldConfig,
    repo: &dyn RecordRepository,
) -> Result<Vec<String>, MappingError> {
    match &field.remote {
        None => Ok(record.column_values(&field.name)),
        Some(remote) => Ok(repo
            .find_by_column(&remote.table, &remote.key, record.id)?
            .iter()
            .flat_map(|related| related.column_values(&field.name))
            .collect()),
    }
}
