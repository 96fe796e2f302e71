//! Error types for the collection indexer.

use std::path::{Path, PathBuf};

use collection_indexer_repository::{RepositoryError, SearchIndexError};
use collection_indexer_shared::RecordKey;
use thiserror::Error;

/// Errors from reading addon configuration sources.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The addon directory or one of its files could not be read.
    #[error("Cannot read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// A source is not valid JSON or does not have the addon shape.
    #[error("Malformed addon source {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },

    /// A source is well formed but violates an addon rule.
    #[error("Invalid addon source {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    /// Two sources of the same parse target the same table.
    #[error("Addon table {table} declared again in {}", .path.display())]
    DuplicateTable { table: String, path: PathBuf },
}

impl ConfigError {
    pub fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn malformed(path: &Path, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn duplicate_table(table: impl Into<String>, path: &Path) -> Self {
        Self::DuplicateTable {
            table: table.into(),
            path: path.to_path_buf(),
        }
    }

    /// The source file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Malformed { path, .. }
            | Self::Invalid { path, .. }
            | Self::DuplicateTable { path, .. } => path,
        }
    }
}

/// A metadata value that could not be turned into a facet.
///
/// Recoverable: the target facet is left untouched and mapping continues.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Item {record_id}: {measurement} value {raw_value:?} is not a number (see {admin_ref})")]
pub struct ExtractionError {
    pub record_id: i64,
    /// Name of the measurement, e.g. "Height".
    pub measurement: String,
    /// The value after prefix and unit stripping.
    pub raw_value: String,
    /// Admin page of the offending record.
    pub admin_ref: String,
}

/// Resolution of a record URI failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The record is routed by slug but has none (or has no container).
    #[error("Record {0} has no slug to route by")]
    MissingSlug(RecordKey),
}

/// Errors raised while mapping a record into a document.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("URI error: {0}")]
    Uri(#[from] UriError),

    /// The addon configuration could not be loaded.
    #[error("Addon configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// One dependent that could not be resaved during a cascade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cascade from {origin} to {table}{}: {reason}", .id.map(|id| format!("#{}", id)).unwrap_or_default())]
pub struct CascadeFailure {
    /// The record whose save triggered this step.
    pub origin: RecordKey,
    /// Table of the dependent.
    pub table: String,
    /// Id of the dependent, when known.
    pub id: Option<i64>,
    pub reason: String,
}

impl CascadeFailure {
    pub fn new(
        origin: RecordKey,
        table: impl Into<String>,
        id: Option<i64>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            table: table.into(),
            id,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during a reindex run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error reading the content repository.
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),

    /// Error mapping a record.
    #[error("Mapping error: {0}")]
    MappingError(#[from] MappingError),

    /// Error from the search engine.
    #[error("Search index error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl IngestError {
    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}
