//! Content repository trait definition.

use collection_indexer_shared::{FieldDefinition, Record};

use crate::errors::RepositoryError;
use crate::types::ListQuery;

/// Read access to the content repository, plus the ability to trigger a
/// record's own save.
///
/// Tables are addressed by name (`RecordKind::table_name`), so records of
/// addon-governed tables unknown at build time can be read the same way as
/// items.
pub trait RecordRepository: Send + Sync {
    /// Fetch one record by id.
    fn find(&self, table: &str, id: i64) -> Result<Option<Record>, RepositoryError>;

    /// Fetch every record of `table` whose `column` equals `value`, id ascending.
    fn find_by_column(
        &self,
        table: &str,
        column: &str,
        value: i64,
    ) -> Result<Vec<Record>, RepositoryError>;

    /// List one page of `table`.
    fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, RepositoryError>;

    /// Search field definitions used by generic element mapping.
    fn field_definitions(&self) -> Result<Vec<FieldDefinition>, RepositoryError>;

    /// Collections whose items must not be indexed.
    fn excluded_collections(&self) -> Result<Vec<i64>, RepositoryError>;

    /// Save a record again so that its dependants are refreshed.
    ///
    /// Implementations must only save the given record; propagation to
    /// dependants is driven by the caller.
    fn resave(&self, record: &Record) -> Result<(), RepositoryError>;
}
