//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the collection index.

use serde_json::{json, Value};

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The alias name for the search index (used for all operations).
    pub alias: String,
    /// The version number for the index (e.g., 0 for "collection_v0").
    pub version: u32,
    /// Namespace prefix of domain facet fields.
    pub facet_prefix: String,
}

/// Default namespace prefix of domain facet fields.
pub const DEFAULT_FACET_PREFIX: &str = "seal_";

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name (the core name)
    /// * `version` - The version number
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
            facet_prefix: DEFAULT_FACET_PREFIX.to_string(),
        }
    }

    pub fn with_facet_prefix(mut self, facet_prefix: impl Into<String>) -> Self {
        self.facet_prefix = facet_prefix.into();
        self
    }

    /// The concrete index behind the alias (e.g., "collection_v0").
    pub fn versioned_index_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

/// Get the index settings and mappings for the collection index.
///
/// Documents have a handful of fixed system fields; everything else is
/// mapped through dynamic templates keyed on the field name:
/// - `*_t`: searchable text
/// - `*_s`: exact-value facet values
/// - `{facet_prefix}*`: domain facets (exact values)
/// - `tag`: exact-value tags
///
/// # Arguments
///
/// * `alias` - The alias to attach to the new index
/// * `facet_prefix` - Namespace prefix of domain facets (e.g., "seal_")
pub fn get_index_settings(alias: &str, facet_prefix: &str) -> Value {
    let mut aliases = serde_json::Map::new();
    aliases.insert(alias.to_string(), json!({}));

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "aliases": aliases,
        "mappings": {
            "dynamic_templates": [
                {
                    "text_fields": {
                        "match": "*_t",
                        "mapping": { "type": "text" }
                    }
                },
                {
                    "facet_fields": {
                        "match": "*_s",
                        "mapping": { "type": "keyword" }
                    }
                },
                {
                    "domain_facets": {
                        "match": format!("{}*", facet_prefix),
                        "mapping": { "type": "keyword" }
                    }
                }
            ],
            "properties": {
                "id": { "type": "keyword" },
                "resulttype": { "type": "keyword" },
                "model": { "type": "keyword" },
                "modelid": { "type": "long" },
                "public": { "type": "boolean" },
                "featured": { "type": "boolean" },
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": { "type": "keyword" }
                    }
                },
                "itemtype": { "type": "keyword" },
                "collection": { "type": "keyword" },
                "tag": { "type": "keyword" },
                "url": { "type": "keyword", "index": false },
                "indexed_at": { "type": "date" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings("collection", "seal_");

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["aliases"]["collection"].is_object());
        assert_eq!(settings["mappings"]["properties"]["id"]["type"], "keyword");
        assert_eq!(settings["mappings"]["properties"]["modelid"]["type"], "long");

        let templates = settings["mappings"]["dynamic_templates"]
            .as_array()
            .unwrap();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0]["text_fields"]["match"], "*_t");
        assert_eq!(templates[1]["facet_fields"]["mapping"]["type"], "keyword");
        assert_eq!(templates[2]["domain_facets"]["match"], "seal_*");
    }

    #[test]
    fn test_versioned_index_name() {
        assert_eq!(IndexConfig::new("collection", 0).versioned_index_name(), "collection_v0");
        assert_eq!(IndexConfig::new("seals", 42).versioned_index_name(), "seals_v42");
    }
}
