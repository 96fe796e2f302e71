//! Request and response types for repository and search index operations.

use crate::errors::SearchIndexError;

/// Sort order of a repository listing. Listings are always sorted by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// One page of a repository listing.
///
/// `exclude_collections` drops records that belong to one of the given
/// collections; records without a collection are always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Number of records to skip.
    pub offset: usize,
    /// Maximum number of records to return; `None` returns the rest.
    pub limit: Option<usize>,
    pub sort: SortOrder,
    pub exclude_collections: Vec<i64>,
}

impl ListQuery {
    /// Every record, id ascending.
    pub fn all() -> Self {
        Self::default()
    }

    /// A page of `limit` records starting at `offset`, id ascending.
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, collections: Vec<i64>) -> Self {
        self.exclude_collections = collections;
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Result of a batch operation for a single document.
///
/// Indicates whether indexing the document succeeded and includes error
/// details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document identifier.
    pub document_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    pub fn succeeded(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(document_id: impl Into<String>, error: SearchIndexError) -> Self {
        Self {
            document_id: document_id.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// This allows callers to handle partial failures gracefully.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each document.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: BatchOperationSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded("Item_1"),
            BatchOperationResult::failed("Item_2", SearchIndexError::index("mapper_parsing_exception")),
        ]);
        assert_eq!((summary.total, summary.succeeded, summary.failed), (2, 1, 1));

        summary.merge(BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded("Item_3"),
        ]));
        assert_eq!((summary.total, summary.succeeded, summary.failed), (3, 2, 1));
        assert_eq!(summary.results[2].document_id, "Item_3");
    }

    #[test]
    fn test_page_query() {
        let query = ListQuery::page(200, 100).excluding(vec![4]);
        assert_eq!(query.offset, 200);
        assert_eq!(query.limit, Some(100));
        assert_eq!(query.sort, SortOrder::Ascending);
        assert_eq!(query.exclude_collections, vec![4]);
    }
}
