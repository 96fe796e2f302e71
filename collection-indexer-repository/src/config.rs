//! Configuration types for the search connection and the SearchIndexService.

use std::env;

/// Default search host.
pub const DEFAULT_SEARCH_HOST: &str = "localhost";

/// Default search port.
pub const DEFAULT_SEARCH_PORT: u16 = 9200;

/// Default core (index alias) name.
pub const DEFAULT_SEARCH_CORE: &str = "collection";

/// Connection parameters of the search engine.
///
/// The core name is used as the index alias; every document operation goes
/// through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConnectionConfig {
    pub host: String,
    pub port: u16,
    pub core: String,
}

/// Per-call overrides of a [`SearchConnectionConfig`].
///
/// Missing values fall back to the base configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub core: Option<String>,
}

impl Default for SearchConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SEARCH_HOST.to_string(),
            port: DEFAULT_SEARCH_PORT,
            core: DEFAULT_SEARCH_CORE.to_string(),
        }
    }
}

impl SearchConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16, core: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            core: core.into(),
        }
    }

    /// Read the connection from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_HOST`: search host (default: localhost)
    /// - `SEARCH_PORT`: search port (default: 9200)
    /// - `SEARCH_CORE`: core / index alias (default: collection)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the connection from an arbitrary key lookup.
    ///
    /// An unparsable port falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("SEARCH_HOST").unwrap_or(defaults.host),
            port: lookup("SEARCH_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            core: lookup("SEARCH_CORE").unwrap_or(defaults.core),
        }
    }

    /// Apply per-call overrides on top of this configuration.
    pub fn with_overrides(&self, overrides: &ConnectionOverrides) -> Self {
        Self {
            host: overrides.host.clone().unwrap_or_else(|| self.host.clone()),
            port: overrides.port.unwrap_or(self.port),
            core: overrides.core.clone().unwrap_or_else(|| self.core.clone()),
        }
    }

    /// Base URL of the search engine.
    pub fn url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// Configuration for the SearchIndexService.
///
/// This struct allows customization of service behavior, particularly around batch
/// operation limits. Use this to control resource usage and prevent accidentally
/// sending overly large batches to the search index backend.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Maximum number of documents sent in a single bulk request.
    ///
    /// Larger submissions are split into several requests. Set to `None` to
    /// send everything at once. Defaults to 1000.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
        }
    }
}

impl SearchIndexServiceConfig {
    /// Create a config with no batch size limit.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_defaults() {
        let config = SearchConnectionConfig::from_lookup(|_| None);
        assert_eq!(config, SearchConnectionConfig::default());
        assert_eq!(config.url(), "http://localhost:9200");
    }

    #[test]
    fn test_from_lookup_values() {
        let vars: HashMap<&str, &str> = [
            ("SEARCH_HOST", "search.internal"),
            ("SEARCH_PORT", "8983"),
            ("SEARCH_CORE", "seals"),
        ]
        .into_iter()
        .collect();

        let config = SearchConnectionConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.host, "search.internal");
        assert_eq!(config.port, 8983);
        assert_eq!(config.core, "seals");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = SearchConnectionConfig::from_lookup(|k| {
            (k == "SEARCH_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, DEFAULT_SEARCH_PORT);
    }

    #[test]
    fn test_overrides_only_replace_given_values() {
        let base = SearchConnectionConfig::new("localhost", 9200, "collection");
        let overrides = ConnectionOverrides {
            port: Some(9201),
            ..Default::default()
        };

        let merged = base.with_overrides(&overrides);

        assert_eq!(merged.host, "localhost");
        assert_eq!(merged.port, 9201);
        assert_eq!(merged.core, "collection");
    }

    #[test]
    fn test_url_keeps_scheme() {
        let config = SearchConnectionConfig::new("https://search.example.org/", 443, "c");
        assert_eq!(config.url(), "https://search.example.org:443");
    }
}
