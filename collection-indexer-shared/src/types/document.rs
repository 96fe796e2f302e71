//! Search document types.
//!
//! This module defines the document structure that is sent to the search
//! engine: a fixed set of system fields plus two open namespaces, one for
//! single-valued facets and one for accumulating multi-valued fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Names of the system fields. Facets and multi-valued fields share the
/// document's top-level namespace and must not use them.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "resulttype",
    "model",
    "modelid",
    "public",
    "title",
    "itemtype",
    "featured",
    "collection",
    "url",
    "indexed_at",
];

/// Document representation for the search index.
///
/// The document serializes to a flat JSON object. System fields keep their
/// own names (`id`, `resulttype`, `model`, ...); facet and multi-valued
/// entries are written as top-level keys next to them.
///
/// # Fields
///
/// - `id`: Unique document identifier, `"{Type}_{numericId}"`
/// - `resulttype`: Display label of the record type
/// - `model`: Repository table of the record
/// - `modelid`: Numeric id of the record
/// - `public`: Visibility flag
/// - `title`: Display title
/// - `itemtype`: Item type name, items only
/// - `featured`: Featured flag, items only
/// - `collection`: Title of the owning collection, items only
/// - `url`: Public address of the record
/// - `indexed_at`: Timestamp when the document was built
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resulttype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itemtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub indexed_at: DateTime<Utc>,
    /// Single-valued facets, last write wins.
    #[serde(flatten)]
    facets: BTreeMap<String, String>,
    /// Multi-valued fields, order-preserving, duplicates allowed.
    #[serde(flatten)]
    multi: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// Create an empty document with the given identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use collection_indexer_shared::Document;
    ///
    /// let mut doc = Document::new("Item_12");
    /// doc.set_facet("seal_material", Some("Stone".to_string()));
    /// doc.push_multi("tag", "cylinder");
    /// assert_eq!(doc.facet("seal_material"), Some("Stone"));
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resulttype: None,
            model: None,
            modelid: None,
            public: None,
            title: None,
            itemtype: None,
            featured: None,
            collection: None,
            url: None,
            indexed_at: Utc::now(),
            facets: BTreeMap::new(),
            multi: BTreeMap::new(),
        }
    }

    /// Create a document carrying the identity system fields of a record.
    ///
    /// The id is `"{model}_{model_id}"`.
    pub fn for_record(
        result_type: impl Into<String>,
        model: impl Into<String>,
        model_id: i64,
    ) -> Self {
        let model = model.into();
        let mut doc = Self::new(format!("{}_{}", model, model_id));
        doc.resulttype = Some(result_type.into());
        doc.model = Some(model);
        doc.modelid = Some(model_id);
        doc
    }

    /// The identifier used by the search index.
    pub fn document_id(&self) -> &str {
        &self.id
    }

    /// Whether `name` is a system field name.
    pub fn is_reserved_field(name: &str) -> bool {
        RESERVED_FIELDS.contains(&name)
    }

    /// Set a single-valued facet. `None` unsets the facet.
    pub fn set_facet(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        debug_assert!(
            !Self::is_reserved_field(&name),
            "facet {name} collides with a system field"
        );
        match value {
            Some(value) => {
                self.facets.insert(name, value);
            }
            None => {
                self.facets.remove(&name);
            }
        }
    }

    pub fn facet(&self, name: &str) -> Option<&str> {
        self.facets.get(name).map(String::as_str)
    }

    pub fn facets(&self) -> &BTreeMap<String, String> {
        &self.facets
    }

    /// Append a value to a multi-valued field.
    pub fn push_multi(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        debug_assert!(
            !Self::is_reserved_field(&name),
            "multi-valued field {name} collides with a system field"
        );
        self.multi.entry(name).or_default().push(value.into());
    }

    /// Values of a multi-valued field; empty when never written.
    pub fn multi(&self, name: &str) -> &[String] {
        self.multi.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn multi_values(&self) -> &BTreeMap<String, Vec<String>> {
        &self.multi
    }
}
