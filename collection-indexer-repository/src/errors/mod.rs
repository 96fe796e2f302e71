//! Error types for the collection indexer repository.
//!
//! This module provides one error type for search index operations and one
//! for content repository access.

mod repository_error;
mod search_index_error;

pub use repository_error::RepositoryError;
pub use search_index_error::SearchIndexError;
