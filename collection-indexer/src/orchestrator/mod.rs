//! Orchestrator module for the collection indexer.
//!
//! Coordinates the repository, the mappers, the addon registry and the
//! loader: full reindex, delete-all, ping, and reindexing after a record
//! was saved.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use collection_indexer_repository::{ListQuery, RecordRepository, SearchIndexService};
use collection_indexer_shared::{Document, Record, RecordKind};
use tracing::{debug, info, instrument, warn};

use crate::addons::{AddonParser, AddonRegistry, CascadeReport, JsonAddonParser};
use crate::errors::{ExtractionError, IngestError, MappingError};
use crate::loader::{LoadStats, LoaderConfig, SearchLoader};
use crate::mapper::{AddonMapper, ItemMapper};

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of items read from the repository per page. The index is
    /// committed after every page.
    pub page_size: usize,
    /// Documents per bulk request.
    pub batch_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            batch_size: LoaderConfig::default().batch_size,
        }
    }
}

/// Outcome of a full reindex.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Item documents submitted.
    pub items: u64,
    /// Addon documents submitted.
    pub addon_documents: u64,
    /// Documents the search engine rejected.
    pub failed: u64,
    /// Invalid measurements met while mapping items.
    pub diagnostics: Vec<ExtractionError>,
}

/// Outcome of reindexing a saved record.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    /// Ids of the documents submitted, the saved record's first.
    pub indexed: Vec<String>,
    pub children: CascadeReport,
    pub remote_parents: CascadeReport,
}

/// Orchestrator that coordinates the indexing components.
pub struct Orchestrator<P: AddonParser = JsonAddonParser> {
    repo: Arc<dyn RecordRepository>,
    service: Arc<SearchIndexService>,
    registry: AddonRegistry<P>,
    item_mapper: ItemMapper,
    addon_mapper: AddonMapper,
    loader: SearchLoader,
    config: OrchestratorConfig,
}

impl<P: AddonParser> Orchestrator<P> {
    /// Create a new orchestrator with the given components.
    pub fn new(
        repo: Arc<dyn RecordRepository>,
        service: Arc<SearchIndexService>,
        registry: AddonRegistry<P>,
        item_mapper: ItemMapper,
        addon_mapper: AddonMapper,
    ) -> Self {
        Self::with_config(
            repo,
            service,
            registry,
            item_mapper,
            addon_mapper,
            OrchestratorConfig::default(),
        )
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        repo: Arc<dyn RecordRepository>,
        service: Arc<SearchIndexService>,
        registry: AddonRegistry<P>,
        item_mapper: ItemMapper,
        addon_mapper: AddonMapper,
        config: OrchestratorConfig,
    ) -> Self {
        let loader = SearchLoader::with_config(
            service.clone(),
            LoaderConfig {
                batch_size: config.batch_size.max(1),
            },
        );
        Self {
            repo,
            service,
            registry,
            item_mapper,
            addon_mapper,
            loader,
            config,
        }
    }

    /// Totals of every document submitted through this orchestrator.
    pub fn load_stats(&self) -> LoadStats {
        self.loader.stats()
    }

    pub fn registry(&self) -> &AddonRegistry<P> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AddonRegistry<P> {
        &mut self.registry
    }

    /// Reindex every item and every addon record.
    ///
    /// Items are read page by page, id ascending, skipping excluded
    /// collections; public and private items alike are indexed. The index
    /// is committed after every page and after the addon documents, then
    /// optimized.
    #[instrument(skip(self))]
    pub async fn index_all(&mut self) -> Result<IndexReport, IngestError> {
        info!("Starting full reindex");
        let started_at = Utc::now();
        let clock = Instant::now();
        let failed_before = self.loader.stats().failed;

        let excluded = self.repo.excluded_collections()?;
        if !excluded.is_empty() {
            info!(collections = ?excluded, "Skipping excluded collections");
        }

        let page_size = self.config.page_size.max(1);
        let mut offset = 0;
        let mut items = 0u64;
        let mut diagnostics = Vec::new();

        loop {
            let query = ListQuery::page(offset, page_size).excluding(excluded.clone());
            let page = self.repo.list(RecordKind::Item.table_name(), &query)?;
            if page.is_empty() {
                break;
            }

            for item in &page {
                let mapped = self.item_mapper.map(item, self.repo.as_ref())?;
                diagnostics.extend(mapped.diagnostics);
                self.loader.load(vec![mapped.document]).await?;
                items += 1;
            }
            self.loader.commit().await?;

            debug!(offset = offset, page_items = page.len(), "Indexed item page");
            offset += page.len();
            if page.len() < page_size {
                break;
            }
        }

        let addon_docs = self
            .registry
            .reindex_addons(self.repo.as_ref(), &self.addon_mapper)?;
        let addon_documents = addon_docs.len() as u64;
        self.loader.load(addon_docs).await?;
        self.loader.commit().await?;

        self.service.optimize().await?;

        let report = IndexReport {
            started_at,
            finished_at: Utc::now(),
            items,
            addon_documents,
            failed: self.loader.stats().failed - failed_before,
            diagnostics,
        };

        info!(
            items = report.items,
            addon_documents = report.addon_documents,
            failed = report.failed,
            diagnostics = report.diagnostics.len(),
            elapsed_ms = clock.elapsed().as_millis() as u64,
            "Full reindex complete"
        );
        Ok(report)
    }

    /// Remove every document from the index.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<(), IngestError> {
        self.service.delete_all().await?;
        Ok(())
    }

    /// Check whether the search engine is reachable.
    pub async fn ping(&self) -> bool {
        self.service.ping().await
    }

    /// Map a single record, an item or an addon record.
    ///
    /// Returns `None` for records no mapper handles, and for addon records
    /// that are not indexable.
    pub fn map_record(&mut self, record: &Record) -> Result<Option<Document>, IngestError> {
        if record.kind == RecordKind::Item {
            let mapped = self.item_mapper.map(record, self.repo.as_ref())?;
            return Ok(Some(mapped.document));
        }
        Ok(self
            .registry
            .index_record(record, self.repo.as_ref(), &self.addon_mapper)?)
    }

    /// Reindex a record after it was saved, resave its dependents and
    /// reindex them too.
    #[instrument(skip(self, record), fields(record = %record.key()))]
    pub async fn record_saved(&mut self, record: &Record) -> Result<SaveReport, IngestError> {
        self.registry.parse_all().map_err(MappingError::from)?;

        let mut report = SaveReport::default();
        if let Some(doc) = self.map_record(record)? {
            report.indexed.push(doc.id.clone());
            self.loader.load(vec![doc]).await?;
        }

        report.children = self.registry.resave_children(record, self.repo.as_ref());
        report.remote_parents = self
            .registry
            .resave_remote_parent(record, self.repo.as_ref());

        let resaved: Vec<_> = report
            .children
            .resaved
            .iter()
            .chain(report.remote_parents.resaved.iter())
            .cloned()
            .collect();
        for key in resaved {
            let Some(dependent) = self.repo.find(&key.table, key.id)? else {
                warn!(record = %key, "Resaved record disappeared before reindexing");
                continue;
            };
            if let Some(doc) = self.map_record(&dependent)? {
                if !report.indexed.contains(&doc.id) {
                    report.indexed.push(doc.id.clone());
                    self.loader.load(vec![doc]).await?;
                }
            }
        }

        self.loader.commit().await?;
        info!(
            indexed = report.indexed.len(),
            cascade_failures = report.children.failures.len() + report.remote_parents.failures.len(),
            "Saved record reindexed"
        );
        Ok(report)
    }
}
