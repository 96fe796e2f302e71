//! Utility functions for the collection indexer repository.

use crate::errors::SearchIndexError;

/// Parse and validate a document id of the form `"{Type}_{numericId}"`.
///
/// The type part may itself contain underscores; the id is taken after the
/// last one.
///
/// # Example
///
/// ```
/// use collection_indexer_repository::parse_document_id;
///
/// let (model, id) = parse_document_id("ExhibitPage_12").expect("valid id");
/// assert_eq!(model, "ExhibitPage");
/// assert_eq!(id, 12);
/// ```
pub fn parse_document_id(document_id: &str) -> Result<(&str, i64), SearchIndexError> {
    let (model, id) = document_id.rsplit_once('_').ok_or_else(|| {
        SearchIndexError::validation(format!("Invalid document id: {}", document_id))
    })?;
    if model.is_empty() {
        return Err(SearchIndexError::validation(format!(
            "Document id has no type: {}",
            document_id
        )));
    }
    let id = id.parse::<i64>().map_err(|e| {
        SearchIndexError::validation(format!("Invalid numeric id in {}: {}", document_id, e))
    })?;
    Ok((model, id))
}
