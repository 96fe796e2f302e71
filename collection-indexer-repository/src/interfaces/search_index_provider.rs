//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations.

use async_trait::async_trait;
use collection_indexer_shared::Document;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `SearchIndexService` to enable dependency
/// injection and easy testing with mock implementations.
///
/// # Idempotence
///
/// `add_documents` must overwrite an existing document with the same id, so
/// that submitting the same record twice never yields two documents.
///
/// # Visibility
///
/// Writes are only guaranteed to be visible to searches after `commit`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index and any required aliases exist, creating them if necessary.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Check whether the search engine is reachable.
    ///
    /// Never fails: an unreachable engine yields `false`.
    async fn ping(&self) -> bool;

    /// Index documents, replacing any existing documents with the same ids.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Aggregate statistics and per-document results
    /// * `Err(SearchIndexError)` - If the request fails entirely
    async fn add_documents(
        &self,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Make all previous writes visible to searches.
    async fn commit(&self) -> Result<(), SearchIndexError>;

    /// Compact the index.
    async fn optimize(&self) -> Result<(), SearchIndexError>;

    /// Delete every document matching a query.
    ///
    /// `*:*` matches every document.
    async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError>;
}
