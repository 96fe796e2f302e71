//! Loader module for the collection indexer.
//!
//! Buffers mapped documents and submits them to the search index in batches.

use std::sync::Arc;

use collection_indexer_repository::SearchIndexService;
use collection_indexer_shared::Document;
use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;

/// Configuration for the search loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to batch before flushing.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

/// Counters of documents submitted by a loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub submitted: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Loader that indexes documents into the search engine.
///
/// The loader is responsible for:
/// - Batching documents for efficient bulk indexing
/// - Reporting documents the engine rejected
pub struct SearchLoader {
    service: Arc<SearchIndexService>,
    config: LoaderConfig,
    pending: Vec<Document>,
    stats: LoadStats,
}

impl SearchLoader {
    /// Create a new search loader with the given service.
    pub fn new(service: Arc<SearchIndexService>) -> Self {
        Self::with_config(service, LoaderConfig::default())
    }

    /// Create a new search loader with custom configuration.
    pub fn with_config(service: Arc<SearchIndexService>, config: LoaderConfig) -> Self {
        let batch_size = config.batch_size;
        Self {
            service,
            config,
            pending: Vec::with_capacity(batch_size),
            stats: LoadStats::default(),
        }
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Queue documents, flushing once the batch size is reached.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn load(&mut self, documents: Vec<Document>) -> Result<(), IngestError> {
        self.pending.extend(documents);

        if self.pending.len() >= self.config.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Flush all pending documents to the search index.
    #[instrument(skip(self))]
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let documents: Vec<Document> = self.pending.drain(..).collect();
        let count = documents.len();

        debug!(count = count, "Flushing documents to search index");

        match self.service.add(documents).await {
            Ok(summary) => {
                self.stats.submitted += summary.total as u64;
                self.stats.succeeded += summary.succeeded as u64;
                self.stats.failed += summary.failed as u64;

                if summary.failed > 0 {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Bulk index completed with some failures"
                    );
                    for result in summary.results.iter().filter(|r| !r.success) {
                        if let Some(ref err) = result.error {
                            error!(
                                document_id = %result.document_id,
                                error = %err,
                                "Failed to index document"
                            );
                        }
                    }
                } else {
                    debug!(count = summary.succeeded, "Successfully indexed all documents");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, count = count, "Failed to index documents");
                Err(IngestError::loader(format!(
                    "Failed to index {} documents: {}",
                    count, e
                )))
            }
        }
    }

    /// Flush, then make everything submitted so far searchable.
    pub async fn commit(&mut self) -> Result<(), IngestError> {
        self.flush().await?;
        self.service.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collection_indexer_repository::{
        BatchOperationResult, BatchOperationSummary, SearchIndexError, SearchIndexProvider,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock search provider for testing.
    #[derive(Default)]
    struct MockSearchProvider {
        indexed_count: Arc<AtomicUsize>,
        commit_count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn ping(&self) -> bool {
            true
        }

        async fn add_documents(
            &self,
            documents: &[Document],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            self.indexed_count.fetch_add(documents.len(), Ordering::SeqCst);
            Ok(BatchOperationSummary::from_results(
                documents
                    .iter()
                    .map(|d| {
                        if d.modelid == Some(13) {
                            BatchOperationResult::failed(
                                d.document_id(),
                                SearchIndexError::index("rejected"),
                            )
                        } else {
                            BatchOperationResult::succeeded(d.document_id())
                        }
                    })
                    .collect(),
            ))
        }

        async fn commit(&self) -> Result<(), SearchIndexError> {
            self.commit_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn optimize(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn delete_by_query(&self, _query: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }
    }

    fn documents(ids: std::ops::RangeInclusive<i64>) -> Vec<Document> {
        ids.map(|id| Document::for_record("Item", "Item", id)).collect()
    }

    #[tokio::test]
    async fn test_load_and_flush() {
        let provider = MockSearchProvider::default();
        let indexed = provider.indexed_count.clone();
        let service = Arc::new(SearchIndexService::new(Box::new(provider)));
        let mut loader = SearchLoader::new(service);

        loader.load(documents(1..=2)).await.unwrap();
        assert_eq!(indexed.load(Ordering::SeqCst), 0);

        loader.flush().await.unwrap();
        assert_eq!(indexed.load(Ordering::SeqCst), 2);
        assert_eq!(loader.stats().succeeded, 2);
    }

    #[tokio::test]
    async fn test_load_flushes_at_batch_size() {
        let provider = MockSearchProvider::default();
        let indexed = provider.indexed_count.clone();
        let service = Arc::new(SearchIndexService::new(Box::new(provider)));
        let mut loader = SearchLoader::with_config(service, LoaderConfig { batch_size: 3 });

        loader.load(documents(1..=2)).await.unwrap();
        assert_eq!(indexed.load(Ordering::SeqCst), 0);
        loader.load(documents(3..=4)).await.unwrap();
        assert_eq!(indexed.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_commit_flushes_and_counts_failures() {
        let provider = MockSearchProvider::default();
        let commits = provider.commit_count.clone();
        let service = Arc::new(SearchIndexService::new(Box::new(provider)));
        let mut loader = SearchLoader::new(service);

        loader.load(documents(12..=14)).await.unwrap();
        loader.commit().await.unwrap();

        assert_eq!(commits.load(Ordering::SeqCst), 1);
        assert_eq!(
            loader.stats(),
            LoadStats {
                submitted: 3,
                succeeded: 2,
                failed: 1,
            }
        );
    }
}
