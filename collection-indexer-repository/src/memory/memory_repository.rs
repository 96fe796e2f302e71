//! Snapshot-backed record repository.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use collection_indexer_shared::{FieldDefinition, Record, RecordKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::RepositoryError;
use crate::interfaces::RecordRepository;
use crate::types::{ListQuery, SortOrder};

/// Serialized form of a repository.
///
/// # Example
///
/// ```json
/// {
///   "records": [
///     { "kind": "Item", "id": 1, "public": true,
///       "metadata": [{ "vocabulary": "Dublin Core", "field": "Title", "text": "Seal" }] }
///   ],
///   "fields": [
///     { "vocabulary": "Dublin Core", "element": "Title", "slug": "50", "indexed": true }
///   ],
///   "excluded_collections": [3]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub excluded_collections: Vec<i64>,
}

/// A record repository held entirely in memory.
///
/// Resaving a record only records its key; there are no save hooks. Use
/// [`MemoryRepository::resaved`] to inspect what was resaved.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: BTreeMap<String, BTreeMap<i64, Record>>,
    fields: Vec<FieldDefinition>,
    excluded_collections: Vec<i64>,
    resaved: Mutex<Vec<RecordKey>>,
    failing_resaves: HashSet<RecordKey>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a decoded snapshot.
    pub fn from_snapshot(snapshot: RepositorySnapshot) -> Self {
        let mut repo = Self::new();
        for record in snapshot.records {
            repo.insert(record);
        }
        repo.fields = snapshot.fields;
        repo.excluded_collections = snapshot.excluded_collections;
        repo
    }

    /// Load a repository from a JSON snapshot file.
    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| RepositoryError::io(format!("{}: {}", path.display(), e)))?;
        let snapshot: RepositorySnapshot = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::snapshot(format!("{}: {}", path.display(), e)))?;

        let repo = Self::from_snapshot(snapshot);
        info!(
            path = %path.display(),
            tables = repo.tables.len(),
            records = repo.len(),
            "Loaded repository snapshot"
        );
        Ok(repo)
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, record: Record) {
        self.tables
            .entry(record.table().to_string())
            .or_default()
            .insert(record.id, record);
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.insert(record);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_excluded_collections(mut self, collections: Vec<i64>) -> Self {
        self.excluded_collections = collections;
        self
    }

    /// Make every resave of the given record fail.
    pub fn fail_resave_of(mut self, key: RecordKey) -> Self {
        self.failing_resaves.insert(key);
        self
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of every record resaved so far, in order.
    pub fn resaved(&self) -> Vec<RecordKey> {
        self.resaved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forget the resave log.
    pub fn clear_resaved(&self) {
        self.resaved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn table(&self, table: &str) -> impl Iterator<Item = &Record> {
        self.tables.get(table).into_iter().flat_map(BTreeMap::values)
    }
}

impl RecordRepository for MemoryRepository {
    fn find(&self, table: &str, id: i64) -> Result<Option<Record>, RepositoryError> {
        Ok(self
            .tables
            .get(table)
            .and_then(|records| records.get(&id))
            .cloned())
    }

    fn find_by_column(
        &self,
        table: &str,
        column: &str,
        value: i64,
    ) -> Result<Vec<Record>, RepositoryError> {
        Ok(self
            .table(table)
            .filter(|record| record.column_i64(column) == Some(value))
            .cloned()
            .collect())
    }

    fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, RepositoryError> {
        let mut records: Vec<&Record> = self
            .table(table)
            .filter(|record| match record.collection_id {
                Some(collection) => !query.exclude_collections.contains(&collection),
                None => true,
            })
            .collect();

        if query.sort == SortOrder::Descending {
            records.reverse();
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(records
            .into_iter()
            .skip(query.offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn field_definitions(&self) -> Result<Vec<FieldDefinition>, RepositoryError> {
        Ok(self.fields.clone())
    }

    fn excluded_collections(&self) -> Result<Vec<i64>, RepositoryError> {
        Ok(self.excluded_collections.clone())
    }

    fn resave(&self, record: &Record) -> Result<(), RepositoryError> {
        let key = record.key();
        if self.failing_resaves.contains(&key) {
            return Err(RepositoryError::resave(format!("refused to save {}", key)));
        }

        debug!(record = %key, "Record resaved");
        self.resaved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(key);
        Ok(())
    }
}
