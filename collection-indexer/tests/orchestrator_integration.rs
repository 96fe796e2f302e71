//! Integration tests for the collection indexer orchestrator.
//!
//! These tests use the real Orchestrator, registry and mappers over an
//! in-memory repository and addon sources in a temporary directory, with a
//! mock SearchIndexProvider recording every call.

use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use collection_indexer::addons::AddonRegistry;
use collection_indexer::errors::IngestError;
use collection_indexer::mapper::{AddonMapper, FieldCatalog, ItemMapper, MapperConfig};
use collection_indexer::orchestrator::{Orchestrator, OrchestratorConfig};
use collection_indexer::uri::UriResolver;
use collection_indexer_repository::{
    BatchOperationResult, BatchOperationSummary, MemoryRepository, RecordRepository,
    SearchIndexError, SearchIndexProvider, SearchIndexService,
};
use collection_indexer_shared::{Document, Record, RecordKey, RecordKind};

/// One call received by the mock provider.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Add(Vec<String>),
    Commit,
    Optimize,
    Delete(String),
}

// Mock Search Provider for testing
struct MockSearchProvider {
    calls: Arc<Mutex<Vec<Call>>>,
    documents: Arc<Mutex<Vec<Document>>>,
    reachable: bool,
    fail_adds: bool,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            documents: Arc::new(Mutex::new(Vec::new())),
            reachable: true,
            fail_adds: false,
        }
    }

    fn unreachable() -> Self {
        Self {
            reachable: false,
            fail_adds: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.reachable
    }

    async fn add_documents(
        &self,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if self.fail_adds {
            return Err(SearchIndexError::connection("connection refused"));
        }
        self.calls.lock().unwrap().push(Call::Add(
            documents.iter().map(|d| d.id.clone()).collect(),
        ));
        self.documents
            .lock()
            .unwrap()
            .extend(documents.iter().cloned());
        Ok(BatchOperationSummary::from_results(
            documents
                .iter()
                .map(|d| BatchOperationResult::succeeded(d.document_id()))
                .collect(),
        ))
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.calls.lock().unwrap().push(Call::Commit);
        Ok(())
    }

    async fn optimize(&self) -> Result<(), SearchIndexError> {
        self.calls.lock().unwrap().push(Call::Optimize);
        Ok(())
    }

    async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError> {
        self.calls.lock().unwrap().push(Call::Delete(query.to_string()));
        Ok(())
    }
}

fn addon_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("10-exhibit.json"),
        r#"{ "table": "Exhibit", "flag": "public", "title": "title",
             "fields": [{ "name": "title", "indexed": true }],
             "children": [{ "table": "ExhibitPage", "parent_key": "exhibit_id" }] }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("20-exhibit-page.json"),
        r#"{ "table": "ExhibitPage", "title": "title",
             "fields": [{ "name": "title", "indexed": true }] }"#,
    )
    .unwrap();
    dir
}

fn repository() -> MemoryRepository {
    MemoryRepository::new()
        .with_excluded_collections(vec![9])
        .with_record(Record::new(RecordKind::Collection, 1).with_dc("Title", "Near East"))
        .with_record(
            Record::new(RecordKind::Item, 1)
                .with_public(true)
                .with_collection(1)
                .with_dc("Title", "Cylinder seal")
                .with_dc("Format", "Height : 56 mm"),
        )
        .with_record(
            Record::new(RecordKind::Item, 2)
                .with_collection(1)
                .with_dc("Format", "Width : abc"),
        )
        .with_record(Record::new(RecordKind::Item, 3).with_collection(9))
        .with_record(Record::new(RecordKind::Item, 4))
        .with_record(
            Record::new(RecordKind::Exhibit, 1)
                .with_slug("seals")
                .with_column("public", 1)
                .with_column("title", "Seals of the Near East"),
        )
        .with_record(
            Record::new(RecordKind::Exhibit, 2)
                .with_slug("drafts")
                .with_column("public", 0),
        )
        .with_record(
            Record::new(RecordKind::ExhibitPage, 10)
                .with_slug("intro")
                .with_container(RecordKind::Exhibit, "seals")
                .with_column("exhibit_id", 1)
                .with_column("title", "Introduction"),
        )
}

struct Harness {
    orchestrator: Orchestrator,
    repo: Arc<MemoryRepository>,
    calls: Arc<Mutex<Vec<Call>>>,
    documents: Arc<Mutex<Vec<Document>>>,
    _addons: TempDir,
}

fn harness_with(provider: MockSearchProvider) -> Harness {
    let addons = addon_dir();
    let repo = Arc::new(repository());
    let calls = provider.calls.clone();
    let documents = provider.documents.clone();

    let shared: Arc<dyn RecordRepository> = repo.clone();
    let service = Arc::new(SearchIndexService::new(Box::new(provider)));
    let orchestrator = Orchestrator::with_config(
        shared,
        service,
        AddonRegistry::json(addons.path()),
        ItemMapper::new(FieldCatalog::new(Vec::new()), MapperConfig::default()),
        AddonMapper::new(UriResolver::new("http://museum.example")),
        OrchestratorConfig {
            page_size: 2,
            batch_size: 100,
        },
    );

    Harness {
        orchestrator,
        repo,
        calls,
        documents,
        _addons: addons,
    }
}

fn harness() -> Harness {
    harness_with(MockSearchProvider::new())
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_index_all_pages_items_then_addons() {
    let mut h = harness();

    let report = h.orchestrator.index_all().await.unwrap();

    assert_eq!(report.items, 3);
    assert_eq!(report.addon_documents, 2);
    assert_eq!(report.failed, 0);
    assert!(report.finished_at >= report.started_at);

    // one commit per item page, one after the addons, then optimize
    assert_eq!(
        *h.calls.lock().unwrap(),
        vec![
            Call::Add(ids(&["Item_1", "Item_2"])),
            Call::Commit,
            Call::Add(ids(&["Item_4"])),
            Call::Commit,
            Call::Add(ids(&["Exhibit_1", "ExhibitPage_10"])),
            Call::Commit,
            Call::Optimize,
        ]
    );
}

#[tokio::test]
async fn test_index_all_documents() {
    let mut h = harness();
    h.orchestrator.index_all().await.unwrap();

    let documents = h.documents.lock().unwrap();
    let item = documents.iter().find(|d| d.id == "Item_1").unwrap();
    assert_eq!(item.title.as_deref(), Some("Cylinder seal"));
    assert_eq!(item.collection.as_deref(), Some("Near East"));
    assert_eq!(item.facet("seal_height"), Some("> 55mm"));
    assert_eq!(item.public, Some(true));

    let exhibit = documents.iter().find(|d| d.id == "Exhibit_1").unwrap();
    assert_eq!(exhibit.title.as_deref(), Some("Seals of the Near East"));
    assert_eq!(exhibit.multi("title_t"), ["Seals of the Near East"]);
    assert!(exhibit.url.as_deref().unwrap().ends_with("/seals"));

    assert!(!documents.iter().any(|d| d.id == "Item_3"));
    assert!(!documents.iter().any(|d| d.id == "Exhibit_2"));
}

#[tokio::test]
async fn test_index_all_reports_invalid_measurements() {
    let mut h = harness();

    let report = h.orchestrator.index_all().await.unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].record_id, 2);
    assert_eq!(report.diagnostics[0].measurement, "Width");
    assert_eq!(report.diagnostics[0].raw_value, "abc");
}

#[tokio::test]
async fn test_document_id_matches_get_id() {
    let mut h = harness();
    h.orchestrator.index_all().await.unwrap();

    let exhibit = h.repo.find("Exhibit", 1).unwrap().unwrap();
    let expected = h.orchestrator.registry_mut().get_id(&exhibit).unwrap();

    let documents = h.documents.lock().unwrap();
    assert!(documents.iter().any(|d| Some(&d.id) == expected.as_ref()));
}

#[tokio::test]
async fn test_delete_all() {
    let h = harness();

    h.orchestrator.delete_all().await.unwrap();

    assert_eq!(
        *h.calls.lock().unwrap(),
        vec![Call::Delete("*:*".to_string()), Call::Commit, Call::Optimize]
    );
}

#[tokio::test]
async fn test_ping() {
    assert!(harness().orchestrator.ping().await);
    assert!(!harness_with(MockSearchProvider::unreachable()).orchestrator.ping().await);
}

#[tokio::test]
async fn test_index_all_surfaces_search_errors() {
    let mut h = harness_with(MockSearchProvider::unreachable());

    let result = h.orchestrator.index_all().await;

    assert!(matches!(result, Err(IngestError::LoaderError(_))));
}

#[tokio::test]
async fn test_record_saved_reindexes_dependents() {
    let mut h = harness();
    let exhibit = h.repo.find("Exhibit", 1).unwrap().unwrap();

    let report = h.orchestrator.record_saved(&exhibit).await.unwrap();

    assert_eq!(report.indexed, ids(&["Exhibit_1", "ExhibitPage_10"]));
    assert_eq!(report.children.resaved, vec![RecordKey::new("ExhibitPage", 10)]);
    assert!(report.children.is_clean());
    assert!(report.remote_parents.resaved.is_empty());
    assert_eq!(h.repo.resaved(), vec![RecordKey::new("ExhibitPage", 10)]);
    assert_eq!(h.calls.lock().unwrap().last(), Some(&Call::Commit));
}

#[tokio::test]
async fn test_record_saved_twice_is_idempotent() {
    let mut h = harness();
    let exhibit = h.repo.find("Exhibit", 1).unwrap().unwrap();

    let first = h.orchestrator.record_saved(&exhibit).await.unwrap();
    let first_resaved = h.repo.resaved();
    h.repo.clear_resaved();
    let second = h.orchestrator.record_saved(&exhibit).await.unwrap();

    assert_eq!(first.indexed, second.indexed);
    assert_eq!(first.children, second.children);
    assert_eq!(first_resaved, h.repo.resaved());
}

#[tokio::test]
async fn test_record_saved_skips_non_indexable_records() {
    let mut h = harness();
    let draft = h.repo.find("Exhibit", 2).unwrap().unwrap();

    let report = h.orchestrator.record_saved(&draft).await.unwrap();

    assert!(report.indexed.is_empty());
    assert!(h
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|call| !matches!(call, Call::Add(_))));
}

#[tokio::test]
async fn test_record_saved_indexes_items() {
    let mut h = harness();
    let item = h.repo.find("Item", 4).unwrap().unwrap();

    let report = h.orchestrator.record_saved(&item).await.unwrap();

    assert_eq!(report.indexed, ids(&["Item_4"]));
    assert_eq!(
        *h.calls.lock().unwrap(),
        vec![Call::Add(ids(&["Item_4"])), Call::Commit]
    );
}
