//! Configuration and dependency initialization for the collection indexer.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::path::PathBuf;

use collection_indexer_repository::opensearch::DEFAULT_FACET_PREFIX;
use collection_indexer_repository::SearchConnectionConfig;

/// Default directory holding the addon sources.
pub const DEFAULT_ADDON_DIR: &str = "addons";

/// Default path prefix of admin pages.
pub const DEFAULT_ADMIN_BASE: &str = "/admin";

/// Default public base URL of the site.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost";

/// Default number of items read per repository page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Settings of an indexer run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerConfig {
    pub connection: SearchConnectionConfig,
    pub addon_dir: PathBuf,
    pub admin_base: String,
    pub public_base_url: String,
    pub facet_prefix: String,
    pub index_version: u32,
    /// Repository snapshot to read records from; none means an empty
    /// repository.
    pub snapshot_path: Option<PathBuf>,
    pub page_size: usize,
    pub batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            connection: SearchConnectionConfig::default(),
            addon_dir: PathBuf::from(DEFAULT_ADDON_DIR),
            admin_base: DEFAULT_ADMIN_BASE.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            facet_prefix: DEFAULT_FACET_PREFIX.to_string(),
            index_version: 0,
            snapshot_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl IndexerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_HOST`, `SEARCH_PORT`, `SEARCH_CORE`: search connection
    /// - `ADDON_DIR`: addon source directory (default: addons)
    /// - `ADMIN_BASE`: admin path prefix (default: /admin)
    /// - `PUBLIC_BASE_URL`: public site URL (default: http://localhost)
    /// - `FACET_PREFIX`: domain facet prefix (default: seal_)
    /// - `INDEX_VERSION`: versioned index number (default: 0)
    /// - `SNAPSHOT_PATH`: repository snapshot file (default: none)
    /// - `PAGE_SIZE`: items per repository page (default: 100)
    /// - `BATCH_SIZE`: documents per bulk request (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unparsable or zero numbers fall back to their defaults, and so does an
    /// empty facet prefix: unprefixed facets would shadow system fields.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let positive = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            connection: SearchConnectionConfig::from_lookup(&lookup),
            addon_dir: lookup("ADDON_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.addon_dir),
            admin_base: lookup("ADMIN_BASE").unwrap_or(defaults.admin_base),
            public_base_url: lookup("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            facet_prefix: lookup("FACET_PREFIX")
                .filter(|prefix| !prefix.trim().is_empty())
                .unwrap_or(defaults.facet_prefix),
            index_version: lookup("INDEX_VERSION")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.index_version),
            snapshot_path: lookup("SNAPSHOT_PATH").map(PathBuf::from),
            page_size: positive("PAGE_SIZE", defaults.page_size),
            batch_size: positive("BATCH_SIZE", defaults.batch_size),
        }
    }
}
