//! Dependency initialization and wiring for the collection indexer.

use std::sync::Arc;

use collection_indexer_repository::{
    ConnectionOverrides, MemoryRepository, OpenSearchProvider, RecordRepository,
    SearchIndexService,
};
use tracing::{info, warn};

use crate::addons::AddonRegistry;
use crate::config::IndexerConfig;
use crate::mapper::{AddonMapper, FieldCatalog, ItemMapper, MapperConfig};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::uri::UriResolver;
use crate::IndexingError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    pub service: Arc<SearchIndexService>,
}

impl Dependencies {
    /// Wire every component from `config`, with `overrides` applied to the
    /// search connection.
    ///
    /// Does not contact the search engine; see [`Dependencies::connect`].
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the snapshot or the field catalog cannot be read
    pub async fn new(
        config: &IndexerConfig,
        overrides: &ConnectionOverrides,
    ) -> Result<Self, IndexingError> {
        let connection = config.connection.with_overrides(overrides);

        info!(
            search_url = %connection.url(),
            core = %connection.core,
            index_version = config.index_version,
            addon_dir = %config.addon_dir.display(),
            snapshot = ?config.snapshot_path,
            "Initializing dependencies"
        );

        let provider =
            OpenSearchProvider::connect(&connection, config.index_version, &config.facet_prefix)
                .await
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
                })?;
        let service = Arc::new(SearchIndexService::new(Box::new(provider)));

        let repo: Arc<dyn RecordRepository> = match &config.snapshot_path {
            Some(path) => Arc::new(MemoryRepository::from_snapshot_file(path).map_err(|e| {
                IndexingError::config(format!("Failed to load repository snapshot: {}", e))
            })?),
            None => {
                warn!("No repository snapshot configured, indexing an empty repository");
                Arc::new(MemoryRepository::new())
            }
        };

        let catalog = FieldCatalog::from_repository(repo.as_ref())
            .map_err(|e| IndexingError::config(format!("Failed to read field definitions: {}", e)))?;
        info!(fields = catalog.len(), "Field catalog loaded");

        let item_mapper = ItemMapper::new(
            catalog,
            MapperConfig::new(config.facet_prefix.clone(), config.admin_base.clone()),
        );
        let addon_mapper = AddonMapper::new(UriResolver::new(config.public_base_url.clone()));
        let registry = AddonRegistry::json(config.addon_dir.clone());

        let orchestrator = Orchestrator::with_config(
            repo,
            service.clone(),
            registry,
            item_mapper,
            addon_mapper,
            OrchestratorConfig {
                page_size: config.page_size,
                batch_size: config.batch_size,
            },
        );

        Ok(Self {
            orchestrator,
            service,
        })
    }

    /// Wire every component and make sure the index and its alias exist.
    pub async fn connect(
        config: &IndexerConfig,
        overrides: &ConnectionOverrides,
    ) -> Result<Self, IndexingError> {
        let deps = Self::new(config, overrides).await?;

        // Exits if index and alias cannot be created
        deps.service
            .ensure_index_exists()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to ensure index exists: {}", e)))?;

        info!("Search index ready");
        Ok(deps)
    }
}
