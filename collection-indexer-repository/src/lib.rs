//! # Collection Indexer Repository
//!
//! This crate provides the traits and implementations the indexer uses to
//! talk to the outside world:
//!
//! - [`SearchIndexProvider`]: the search engine client, with a concrete
//!   [`OpenSearchProvider`] implementation
//! - [`RecordRepository`]: read access to the content repository, with an
//!   in-memory [`MemoryRepository`] that loads from a JSON snapshot
//! - [`SearchIndexService`]: validated, batch-limited access to a provider

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod service;
pub mod types;
pub mod utils;

pub use config::{ConnectionOverrides, SearchConnectionConfig, SearchIndexServiceConfig};
pub use errors::{RepositoryError, SearchIndexError};
pub use interfaces::{RecordRepository, SearchIndexProvider};
pub use memory::{MemoryRepository, RepositorySnapshot};
pub use opensearch::OpenSearchProvider;
pub use service::SearchIndexService;
pub use types::{BatchOperationResult, BatchOperationSummary, ListQuery, SortOrder};
pub use utils::parse_document_id;
