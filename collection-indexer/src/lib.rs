//! # Collection Indexer
//!
//! Maps content repository records into search documents and indexes them
//! into OpenSearch.
//!
//! ## Architecture
//!
//! 1. **Addons**: JSON addon sources declare which extra tables are indexed
//!    and how their records depend on each other
//! 2. **Mapper**: Turns items and addon records into documents
//! 3. **Loader**: Indexes documents into OpenSearch in batches
//! 4. **Orchestrator**: Coordinates full reindexes and save-time reindexing
//!
//! ## Modules
//!
//! - [`addons`]: Addon model, parser, registry and cascading resaves
//! - [`mapper`]: Item and addon document mapping
//! - [`uri`]: Public addresses of records
//! - [`loader`]: Indexes documents into OpenSearch
//! - [`orchestrator`]: Coordinates the indexing flow
//! - [`config`]: Configuration and dependency initialization
//! - [`errors`]: Error types for the indexer

pub mod addons;
pub mod config;
pub mod errors;
pub mod loader;
pub mod mapper;
pub mod orchestrator;
pub mod uri;

pub use config::{Dependencies, IndexerConfig};
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
