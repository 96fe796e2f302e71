//! Document mapping of primary (item) records.

use collection_indexer_repository::opensearch::DEFAULT_FACET_PREFIX;
use collection_indexer_repository::RecordRepository;
use collection_indexer_shared::{Document, Record, RecordKind, DUBLIN_CORE};
use tracing::{instrument, warn};

use crate::errors::{ExtractionError, MappingError};
use crate::mapper::elements::FieldCatalog;
use crate::mapper::extraction::{self, Assignment};

/// Result type and model of item documents.
pub const ITEM_MODEL: &str = "Item";

/// Table of files attached to items, and the column pointing at the item.
const FILE_TABLE: &str = "File";
const FILE_ITEM_COLUMN: &str = "item_id";

/// Settings of the item mapper.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Prefix of every domain facet, e.g. `seal_` for `seal_period`.
    pub facet_prefix: String,
    /// Base URL of the admin site, used in extraction diagnostics.
    pub admin_base: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            facet_prefix: DEFAULT_FACET_PREFIX.to_string(),
            admin_base: "/admin".to_string(),
        }
    }
}

impl MapperConfig {
    pub fn new(facet_prefix: impl Into<String>, admin_base: impl Into<String>) -> Self {
        Self {
            facet_prefix: facet_prefix.into(),
            admin_base: admin_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn admin_ref(&self, item_id: i64) -> String {
        format!("{}/items/show/{}", self.admin_base, item_id)
    }
}

/// A mapped document with the recoverable problems found on the way.
#[derive(Debug)]
pub struct MappedDocument {
    pub document: Document,
    pub diagnostics: Vec<ExtractionError>,
}

/// Maps items into documents: system fields, domain facets, catalogued
/// elements of the item and of its files.
#[derive(Debug, Clone)]
pub struct ItemMapper {
    catalog: FieldCatalog,
    config: MapperConfig,
}

impl ItemMapper {
    pub fn new(catalog: FieldCatalog, config: MapperConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    #[instrument(skip(self, item, repo), fields(item_id = item.id))]
    pub fn map(
        &self,
        item: &Record,
        repo: &dyn RecordRepository,
    ) -> Result<MappedDocument, MappingError> {
        let mut doc = Document::for_record(ITEM_MODEL, ITEM_MODEL, item.id);

        let extraction = extraction::extract(item);
        for assignment in extraction.assignments {
            self.apply(&mut doc, assignment);
        }

        let diagnostics: Vec<ExtractionError> = extraction
            .invalid
            .into_iter()
            .map(|invalid| ExtractionError {
                record_id: item.id,
                measurement: invalid.measurement.name().to_string(),
                raw_value: invalid.raw_value,
                admin_ref: self.config.admin_ref(item.id),
            })
            .collect();
        for diagnostic in &diagnostics {
            warn!(
                item_id = diagnostic.record_id,
                measurement = %diagnostic.measurement,
                value = %diagnostic.raw_value,
                admin = %diagnostic.admin_ref,
                "Invalid measurement, facet left untouched"
            );
        }

        doc.public = Some(item.public);
        doc.title = item
            .metadata_first(DUBLIN_CORE, "Title")
            .map(str::to_string);

        self.catalog.apply(item, &mut doc);

        for tag in &item.tags {
            doc.push_multi("tag", tag.as_str());
        }

        if let Some(collection_id) = item.collection_id {
            if let Some(collection) =
                repo.find(RecordKind::Collection.table_name(), collection_id)?
            {
                doc.collection = collection
                    .metadata_first(DUBLIN_CORE, "Title")
                    .map(str::to_string);
            }
        }

        doc.itemtype = item.item_type.clone();
        doc.featured = Some(item.featured);

        for file in repo.find_by_column(FILE_TABLE, FILE_ITEM_COLUMN, item.id)? {
            self.catalog.apply(&file, &mut doc);
        }

        Ok(MappedDocument {
            document: doc,
            diagnostics,
        })
    }

    fn apply(&self, doc: &mut Document, assignment: Assignment) {
        match assignment {
            Assignment::Facet { field, value } => {
                doc.set_facet(format!("{}{}", self.config.facet_prefix, field), value)
            }
            Assignment::Multi { field, value } => {
                doc.push_multi(format!("{}{}", self.config.facet_prefix, field), value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_indexer_repository::MemoryRepository;
    use collection_indexer_shared::FieldDefinition;

    fn mapper() -> ItemMapper {
        let catalog = FieldCatalog::new(vec![
            FieldDefinition::new(DUBLIN_CORE, "Title", "50").indexed(true),
            FieldDefinition::new(DUBLIN_CORE, "Description", "41")
                .indexed(true)
                .faceted(true),
        ]);
        ItemMapper::new(catalog, MapperConfig::new("seal_", "http://museum.example/admin/"))
    }

    fn seal() -> Record {
        Record::new(RecordKind::Item, 7)
            .with_public(true)
            .with_featured(true)
            .with_dc("Title", "Cylinder seal")
            .with_dc("Title", "Second title")
            .with_dc("Publisher", "Louvre")
            .with_dc("Provenance", "Acquisition history : gift")
            .with_dc("Provenance", "collection De Clercq")
            .with_dc("Temporal Coverage", "Period remarks : neo-Assyrian (c. 800 BC)")
            .with_dc("Spatial Coverage", "Provenience remarks : nineveh")
            .with_dc("Medium", "chalcedony")
            .with_dc("Format", "Height : 56 mm")
            .with_dc("Format", "Width : abc")
            .with_dc("Format", "Thickness : 5 mm")
            .with_dc("Subject", "Subgenre remarks : worship")
            .with_dc("Subject", "star")
            .with_tag("cylinder")
            .with_collection(3)
            .with_item_type("Seal")
    }

    fn repository() -> MemoryRepository {
        MemoryRepository::new()
            .with_record(Record::new(RecordKind::Collection, 3).with_dc("Title", "Near East"))
            .with_record(
                Record::new(RecordKind::File, 70)
                    .with_column("item_id", 7)
                    .with_dc("Description", "impression"),
            )
            .with_record(
                Record::new(RecordKind::File, 71)
                    .with_column("item_id", 8)
                    .with_dc("Description", "other item"),
            )
    }

    #[test]
    fn test_map_item() {
        let mapped = mapper().map(&seal(), &repository()).unwrap();
        let doc = &mapped.document;

        assert_eq!(doc.id, "Item_7");
        assert_eq!(doc.resulttype.as_deref(), Some("Item"));
        assert_eq!(doc.model.as_deref(), Some("Item"));
        assert_eq!(doc.modelid, Some(7));
        assert_eq!(doc.public, Some(true));
        assert_eq!(doc.featured, Some(true));
        assert_eq!(doc.title.as_deref(), Some("Cylinder seal"));
        assert_eq!(doc.collection.as_deref(), Some("Near East"));
        assert_eq!(doc.itemtype.as_deref(), Some("Seal"));
        assert_eq!(doc.multi("tag"), ["cylinder"]);

        assert_eq!(doc.facet("seal_collection"), Some("Louvre"));
        assert_eq!(doc.facet("seal_subcollection"), Some("Collection De Clercq"));
        assert_eq!(doc.facet("seal_period"), Some("Neo-Assyrian"));
        assert_eq!(doc.facet("seal_area"), Some("Nineveh"));
        assert_eq!(doc.facet("seal_material"), Some("Chalcedony"));
        assert_eq!(doc.facet("seal_height"), Some("> 55mm"));
        assert_eq!(doc.facet("seal_diameter"), None);
        assert_eq!(doc.facet("seal_weight"), Some("5-6 mm"));
        assert_eq!(doc.facet("seal_perforated-diameter"), Some("5-6 mm"));
        assert_eq!(doc.facet("seal_iconography"), Some("Worship"));
        assert_eq!(doc.multi("seal_keywords"), ["Star"]);

        assert_eq!(doc.multi("50_t"), ["Cylinder seal", "Second title"]);
        assert_eq!(doc.multi("41_t"), ["impression"]);
        assert_eq!(doc.multi("41_s"), ["impression"]);
    }

    #[test]
    fn test_invalid_measurement_diagnostic() {
        let mapped = mapper().map(&seal(), &repository()).unwrap();

        assert_eq!(
            mapped.diagnostics,
            vec![ExtractionError {
                record_id: 7,
                measurement: "Width".to_string(),
                raw_value: "abc".to_string(),
                admin_ref: "http://museum.example/admin/items/show/7".to_string(),
            }]
        );
    }

    #[test]
    fn test_minimal_item() {
        let item = Record::new(RecordKind::Item, 1);
        let mapped = mapper().map(&item, &MemoryRepository::new()).unwrap();
        let doc = mapped.document;

        assert_eq!(doc.public, Some(false));
        assert!(doc.title.is_none());
        assert!(doc.collection.is_none());
        assert!(doc.facets().is_empty());
        assert!(doc.multi_values().is_empty());
        assert!(mapped.diagnostics.is_empty());
    }

    #[test]
    fn test_custom_facet_prefix() {
        let mapper = ItemMapper::new(FieldCatalog::default(), MapperConfig::new("assyr_", "/admin"));
        let item = Record::new(RecordKind::Item, 1).with_dc("Medium", "stone");

        let doc = mapper.map(&item, &MemoryRepository::new()).unwrap().document;

        assert_eq!(doc.facet("assyr_material"), Some("Stone"));
        assert_eq!(doc.facet("seal_material"), None);
    }
}
