//! Addon configuration model.
//!
//! An addon describes how records of one repository table become search
//! documents: which columns are copied into the document, which of them live
//! on a related table, and which child tables depend on it.

use serde::Deserialize;

/// Indexing configuration of one repository table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddonConfig {
    /// Table governed by this addon.
    pub table: String,
    /// Label shown as the document result type; defaults to the table.
    #[serde(default)]
    pub result_type: Option<String>,
    /// Boolean column gating indexability and visibility.
    #[serde(default)]
    pub flag: Option<String>,
    /// Copy the record's tags into the document.
    #[serde(default)]
    pub tagged: bool,
    /// Field whose first value becomes the document title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub children: Vec<ChildConfig>,
}

/// One field copied into the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Copy values into the searchable `{name}_t` field.
    #[serde(default)]
    pub indexed: bool,
    /// Copy values into the facet `{name}_s` field.
    #[serde(default)]
    pub facet: bool,
    /// Read the values from a related table instead of the record itself.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// Location of a field stored on a related table.
///
/// Records of `table` whose `key` column equals the parent id carry the
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    pub table: String,
    pub key: String,
}

/// A dependent table that must be resaved when its parent changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildConfig {
    pub table: String,
    #[serde(alias = "parentKey")]
    pub parent_key: String,
}

impl AddonConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            result_type: None,
            flag: None,
            tagged: false,
            title: None,
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_child(mut self, table: impl Into<String>, parent_key: impl Into<String>) -> Self {
        self.children.push(ChildConfig {
            table: table.into(),
            parent_key: parent_key.into(),
        });
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn with_title(mut self, field: impl Into<String>) -> Self {
        self.title = Some(field.into());
        self
    }

    pub fn with_result_type(mut self, result_type: impl Into<String>) -> Self {
        self.result_type = Some(result_type.into());
        self
    }

    pub fn tagged(mut self, tagged: bool) -> Self {
        self.tagged = tagged;
        self
    }

    /// Result type label of the documents of this addon.
    pub fn result_type(&self) -> &str {
        self.result_type.as_deref().unwrap_or(&self.table)
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields stored on `table`.
    pub fn remote_fields_on<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a FieldConfig> {
        self.fields
            .iter()
            .filter(move |f| f.remote.as_ref().is_some_and(|r| r.table == table))
    }
}

impl FieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexed: false,
            facet: false,
            remote: None,
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

    pub fn remote(mut self, table: impl Into<String>, key: impl Into<String>) -> Self {
        self.remote = Some(RemoteConfig {
            table: table.into(),
            key: key.into(),
        });
        self
    }

    /// Name of the searchable text field.
    pub fn index_key(&self) -> String {
        format!("{}_t", self.name)
    }

    /// Name of the facet field.
    pub fn facet_key(&self) -> String {
        format!("{}_s", self.name)
    }
}
