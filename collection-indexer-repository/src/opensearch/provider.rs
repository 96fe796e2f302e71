//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use collection_indexer_shared::Document;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesForcemergeParts, IndicesRefreshParts},
    BulkParts, DeleteByQueryParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::SearchConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::{BatchOperationResult, BatchOperationSummary};
use crate::utils;

/// Query that matches every document.
const MATCH_ALL_QUERY: &str = "*:*";

/// OpenSearch provider implementation.
///
/// Documents are written through the index alias with their document id, so
/// resubmitting a record overwrites its previous document.
///
/// # Example
///
/// ```ignore
/// use collection_indexer_repository::opensearch::{IndexConfig, OpenSearchProvider};
///
/// let config = IndexConfig::new("collection", 0);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config).await?;
/// provider.add_documents(&documents).await?;
/// provider.commit().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Create a provider from connection parameters; the core name becomes
    /// the index alias.
    pub async fn connect(
        connection: &SearchConnectionConfig,
        index_version: u32,
        facet_prefix: &str,
    ) -> Result<Self, SearchIndexError> {
        let index_config =
            IndexConfig::new(connection.core.clone(), index_version).with_facet_prefix(facet_prefix);
        Self::new(&connection.url(), index_config).await
    }

    /// Translate a delete query into an OpenSearch query body.
    fn delete_query_body(query: &str) -> Result<Value, SearchIndexError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchIndexError::validation(
                "Delete query must not be empty".to_string(),
            ));
        }

        if query == MATCH_ALL_QUERY {
            Ok(json!({ "query": { "match_all": {} } }))
        } else {
            Ok(json!({ "query": { "query_string": { "query": query } } }))
        }
    }

    /// Build bulk index operations for the valid documents.
    ///
    /// Documents with malformed ids are reported as failures and left out of
    /// the request.
    fn build_bulk_body(
        documents: &[Document],
    ) -> Result<(Vec<JsonBody<Value>>, Vec<BatchOperationResult>), SearchIndexError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        let mut rejected = Vec::new();

        for doc in documents {
            if let Err(e) = utils::parse_document_id(doc.document_id()) {
                rejected.push(BatchOperationResult::failed(doc.document_id(), e));
                continue;
            }
            let source = serde_json::to_value(doc)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            body.push(json!({ "index": { "_id": doc.document_id() } }).into());
            body.push(source.into());
        }

        Ok((body, rejected))
    }

    /// Turn a bulk response body into per-document results.
    fn summarize_bulk_response(response: &Value) -> Vec<BatchOperationResult> {
        let Some(items) = response["items"].as_array() else {
            return Vec::new();
        };

        items
            .iter()
            .map(|item| {
                let op = &item["index"];
                let id = op["_id"].as_str().unwrap_or_default().to_string();
                match op.get("error") {
                    Some(err) if !err.is_null() => {
                        let reason = err["reason"]
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| err.to_string());
                        BatchOperationResult::failed(id, SearchIndexError::index(reason))
                    }
                    _ => BatchOperationResult::succeeded(id),
                }
            })
            .collect()
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Create the versioned index with its alias when the alias does not resolve.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let alias = self.index_config.alias.as_str();
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(alias = %alias, "Search index already exists");
            return Ok(());
        }

        let index_name = self.index_config.versioned_index_name();
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(get_index_settings(alias, &self.index_config.facet_prefix))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index_name, alias = %alias, "Created search index");
        Ok(())
    }

    async fn ping(&self) -> bool {
        match self.client.ping().send().await {
            Ok(response) => response.status_code().is_success(),
            Err(e) => {
                warn!(error = %e, "Ping failed");
                false
            }
        }
    }

    /// Index documents with a single bulk request.
    ///
    /// Every document is written with an `index` operation keyed by its id,
    /// which replaces any previous version.
    async fn add_documents(
        &self,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let (body, mut results) = Self::build_bulk_body(documents)?;

        if body.is_empty() {
            return Ok(BatchOperationSummary::from_results(results));
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.alias))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        results.extend(Self::summarize_bulk_response(&response_body));
        let summary = BatchOperationSummary::from_results(results);

        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk index completed"
        );
        Ok(summary)
    }

    /// Refresh the index so that all writes become searchable.
    async fn commit(&self) -> Result<(), SearchIndexError> {
        let alias = self.index_config.alias.as_str();
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::commit(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Refresh request failed");
            return Err(SearchIndexError::commit(format!(
                "Refresh failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(alias = %alias, "Index committed");
        Ok(())
    }

    /// Force merge the index down to a single segment.
    async fn optimize(&self) -> Result<(), SearchIndexError> {
        let alias = self.index_config.alias.as_str();
        let response = self
            .client
            .indices()
            .forcemerge(IndicesForcemergeParts::Index(&[alias]))
            .max_num_segments(1)
            .send()
            .await
            .map_err(|e| SearchIndexError::optimize(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Force merge request failed");
            return Err(SearchIndexError::optimize(format!(
                "Force merge failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(alias = %alias, "Index optimized");
        Ok(())
    }

    async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError> {
        let body = Self::delete_query_body(query)?;
        let alias = self.index_config.alias.as_str();

        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[alias]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete by query failed");
            return Err(SearchIndexError::delete(format!(
                "Delete by query failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(alias = %alias, query = %query, "Documents deleted by query");
        Ok(())
    }
}
