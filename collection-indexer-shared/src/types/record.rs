//! Repository record types.
//!
//! A `Record` is a read-only snapshot of one row of the content repository:
//! an item, a file, a collection, an exhibit page, or any addon-governed
//! table. The indexer never mutates records; it only reads their metadata,
//! columns and relations.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vocabulary used by the built-in metadata fields.
pub const DUBLIN_CORE: &str = "Dublin Core";

/// The kind of a repository record.
///
/// Known kinds get their own variant so that routing and document mapping
/// can match on them; every other table is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    Item,
    File,
    Collection,
    ItemType,
    SimplePage,
    Exhibit,
    ExhibitPage,
    Other(String),
}

impl RecordKind {
    /// Resolve a repository table name into a kind.
    pub fn from_table(table: &str) -> Self {
        match table {
            "Item" => Self::Item,
            "File" => Self::File,
            "Collection" => Self::Collection,
            "ItemType" => Self::ItemType,
            "SimplePagesPage" => Self::SimplePage,
            "Exhibit" => Self::Exhibit,
            "ExhibitPage" => Self::ExhibitPage,
            other => Self::Other(other.to_string()),
        }
    }

    /// The repository table this kind lives in.
    pub fn table_name(&self) -> &str {
        match self {
            Self::Item => "Item",
            Self::File => "File",
            Self::Collection => "Collection",
            Self::ItemType => "ItemType",
            Self::SimplePage => "SimplePagesPage",
            Self::Exhibit => "Exhibit",
            Self::ExhibitPage => "ExhibitPage",
            Self::Other(table) => table,
        }
    }
}

impl From<String> for RecordKind {
    fn from(table: String) -> Self {
        Self::from_table(&table)
    }
}

impl From<&str> for RecordKind {
    fn from(table: &str) -> Self {
        Self::from_table(table)
    }
}

impl From<RecordKind> for String {
    fn from(kind: RecordKind) -> Self {
        kind.table_name().to_string()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// `(table, id)` identity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub table: String,
    pub id: i64,
}

impl RecordKey {
    pub fn new(table: impl Into<String>, id: i64) -> Self {
        Self {
            table: table.into(),
            id,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.table, self.id)
    }
}

/// One metadata value attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Vocabulary (element set) name, e.g. "Dublin Core".
    pub vocabulary: String,
    /// Field (element) name within the vocabulary, e.g. "Title".
    pub field: String,
    /// Raw text value.
    pub text: String,
}

impl MetadataEntry {
    pub fn new(
        vocabulary: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            vocabulary: vocabulary.into(),
            field: field.into(),
            text: text.into(),
        }
    }
}

/// Reference to the record that contains a nested record (e.g. the exhibit
/// owning an exhibit page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    pub kind: RecordKind,
    pub slug: String,
}

/// A read-only snapshot of a repository record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    pub id: i64,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerRef>,
    /// Ordered metadata entries; a field may appear several times.
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
    /// Raw column values (foreign keys, flags, addon fields).
    #[serde(default)]
    pub columns: Map<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl Record {
    /// Create an empty, private record of the given kind.
    pub fn new(kind: impl Into<RecordKind>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
            public: false,
            featured: false,
            slug: None,
            container: None,
            metadata: Vec::new(),
            columns: Map::new(),
            tags: Vec::new(),
            collection_id: None,
            item_type: None,
        }
    }

    pub fn table(&self) -> &str {
        self.kind.table_name()
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.table(), self.id)
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_container(mut self, kind: impl Into<RecordKind>, slug: impl Into<String>) -> Self {
        self.container = Some(ContainerRef {
            kind: kind.into(),
            slug: slug.into(),
        });
        self
    }

    pub fn with_metadata(
        mut self,
        vocabulary: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.metadata
            .push(MetadataEntry::new(vocabulary, field, text));
        self
    }

    /// Shorthand for a Dublin Core metadata entry.
    pub fn with_dc(self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_metadata(DUBLIN_CORE, field, text)
    }

    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_collection(mut self, collection_id: i64) -> Self {
        self.collection_id = Some(collection_id);
        self
    }

    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// First value of a metadata field (single-value mode).
    pub fn metadata_first(&self, vocabulary: &str, field: &str) -> Option<&str> {
        self.metadata_all(vocabulary, field).into_iter().next()
    }

    /// Every value of a metadata field, in entry order (multi-value mode).
    pub fn metadata_all(&self, vocabulary: &str, field: &str) -> Vec<&str> {
        self.metadata
            .iter()
            .filter(|entry| entry.vocabulary == vocabulary && entry.field == field)
            .map(|entry| entry.text.as_str())
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    /// Integer value of a column; numeric strings are accepted.
    pub fn column_i64(&self, name: &str) -> Option<i64> {
        match self.columns.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn column_str(&self, name: &str) -> Option<&str> {
        self.columns.get(name).and_then(Value::as_str)
    }

    /// Loose truthiness of a column: `true`, non-zero numbers and non-empty
    /// strings other than `"0"` are truthy.
    pub fn column_truthy(&self, name: &str) -> bool {
        match self.columns.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty() && s != "0",
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Null) | None => false,
        }
    }

    /// Textual values of a column: scalars yield one value, arrays one per
    /// scalar element, null or missing columns none.
    pub fn column_values(&self, name: &str) -> Vec<String> {
        match self.columns.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
