//! Search index service implementation.
//!
//! This module provides the main service for interacting with the search index.
//! Application code uses this to add, commit and delete documents.
//!
//! # Note on Document Updates
//!
//! There is no separate `update` function: adding a document whose id already
//! exists replaces it, so re-indexing a record is always an `add`.

use collection_indexer_shared::Document;
use tracing::{debug, info};

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::BatchOperationSummary;

/// Query that matches every document.
pub const MATCH_ALL: &str = "*:*";

/// The main service for interacting with the search index.
///
/// This is the high-level API that application code should use. It provides input
/// validation, batch splitting, and delegates to a `SearchIndexProvider` for
/// actual backend operations. All operations return `SearchIndexError` for consistent
/// error handling.
///
/// # Example
///
/// ```no_run
/// use collection_indexer_repository::SearchIndexService;
/// use collection_indexer_repository::opensearch::{OpenSearchProvider, IndexConfig};
/// use collection_indexer_shared::Document;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IndexConfig::new("collection", 0);
/// let provider = Box::new(OpenSearchProvider::new("http://localhost:9200", config).await?);
/// let service = SearchIndexService::new(provider);
///
/// let mut document = Document::for_record("Item", "Item", 42);
/// document.title = Some("Cylinder seal".to_string());
///
/// service.add(vec![document]).await?;
/// service.commit().await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchIndexService {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration.
    ///
    /// The default configuration sends at most 1000 documents per request.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    pub fn with_config(
        provider: Box<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    /// Ensure the index behind the configured alias exists.
    pub async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        self.provider.ensure_index_exists().await
    }

    /// Check whether the search engine is reachable.
    pub async fn ping(&self) -> bool {
        self.provider.ping().await
    }

    /// Add documents to the index, replacing documents with the same ids.
    ///
    /// Submissions larger than `max_batch_size` are sent as several requests
    /// and their summaries merged. Documents the engine rejects are reported
    /// in the summary rather than failing the whole call.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-document results across all requests
    /// * `Err(SearchIndexError)` - If a request fails entirely
    pub async fn add(&self, documents: Vec<Document>) -> Result<BatchOperationSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        let chunk_size = self
            .config
            .max_batch_size
            .filter(|max| *max > 0)
            .unwrap_or(documents.len());

        let mut summary = BatchOperationSummary::default();
        for chunk in documents.chunks(chunk_size) {
            let chunk_summary = self.provider.add_documents(chunk).await?;
            debug!(
                documents = chunk.len(),
                failed = chunk_summary.failed,
                "Submitted document batch"
            );
            summary.merge(chunk_summary);
        }

        Ok(summary)
    }

    /// Make all previous writes visible to searches.
    pub async fn commit(&self) -> Result<(), SearchIndexError> {
        self.provider.commit().await
    }

    /// Compact the index.
    pub async fn optimize(&self) -> Result<(), SearchIndexError> {
        self.provider.optimize().await
    }

    /// Delete every document matching `query`.
    ///
    /// # Returns
    ///
    /// * `Err(SearchIndexError::ValidationError)` - If the query is empty
    pub async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError> {
        if query.trim().is_empty() {
            return Err(SearchIndexError::validation(
                "Delete query must not be empty".to_string(),
            ));
        }
        self.provider.delete_by_query(query).await
    }

    /// Remove every document, then commit and optimize.
    pub async fn delete_all(&self) -> Result<(), SearchIndexError> {
        self.delete_by_query(MATCH_ALL).await?;
        self.commit().await?;
        self.optimize().await?;
        info!("Deleted all documents from the search index");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchOperationResult;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    #[derive(Default)]
    struct MockProvider {
        batches: Arc<Mutex<Vec<Vec<String>>>>,
        calls: Arc<Mutex<Vec<String>>>,
        should_fail: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn ping(&self) -> bool {
            !self.should_fail
        }

        async fn add_documents(
            &self,
            documents: &[Document],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::bulk_index("Mock failure"));
            }
            let ids: Vec<String> = documents
                .iter()
                .map(|d| d.document_id().to_string())
                .collect();
            self.batches.lock().await.push(ids.clone());
            Ok(BatchOperationSummary::from_results(
                ids.into_iter().map(BatchOperationResult::succeeded).collect(),
            ))
        }

        async fn commit(&self) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push("commit".to_string());
            Ok(())
        }

        async fn optimize(&self) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push("optimize".to_string());
            Ok(())
        }

        async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::delete("Mock failure"));
            }
            self.calls.lock().await.push(format!("delete {}", query));
            Ok(())
        }
    }

    fn documents(count: i64) -> Vec<Document> {
        (1..=count)
            .map(|id| Document::for_record("Item", "Item", id))
            .collect()
    }

    #[tokio::test]
    async fn test_add_splits_into_batches() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service = SearchIndexService::with_config(
            Box::new(provider),
            SearchIndexServiceConfig::with_max_batch_size(2),
        );

        let summary = service.add(documents(5)).await.unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded, 5);
        let batches = batches.lock().await;
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches[2], vec!["Item_5".to_string()]);
    }

    #[tokio::test]
    async fn test_add_unlimited_sends_one_batch() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service =
            SearchIndexService::with_config(Box::new(provider), SearchIndexServiceConfig::unlimited());

        service.add(documents(3)).await.unwrap();

        assert_eq!(batches.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_empty_does_not_call_provider() {
        let provider = MockProvider::default();
        let batches = provider.batches.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let summary = service.add(Vec::new()).await.unwrap();

        assert_eq!(summary.total, 0);
        assert!(batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_propagates_provider_failure() {
        let provider = MockProvider {
            should_fail: true,
            ..Default::default()
        };
        let service = SearchIndexService::new(Box::new(provider));

        let result = service.add(documents(1)).await;

        assert!(matches!(result, Err(SearchIndexError::BulkIndexError(_))));
    }

    #[tokio::test]
    async fn test_delete_by_query_rejects_empty_query() {
        let provider = MockProvider::default();
        let calls = provider.calls.clone();
        let service = SearchIndexService::new(Box::new(provider));

        let result = service.delete_by_query("  ").await;

        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_deletes_commits_and_optimizes() {
        let provider = MockProvider::default();
        let calls = provider.calls.clone();
        let service = SearchIndexService::new(Box::new(provider));

        service.delete_all().await.unwrap();

        assert_eq!(
            *calls.lock().await,
            vec!["delete *:*", "commit", "optimize"]
        );
    }

    #[tokio::test]
    async fn test_ping() {
        let up = SearchIndexService::new(Box::new(MockProvider::default()));
        let down = SearchIndexService::new(Box::new(MockProvider {
            should_fail: true,
            ..Default::default()
        }));

        assert!(up.ping().await);
        assert!(!down.ping().await);
    }
}
