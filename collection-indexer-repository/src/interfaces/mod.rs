//! Interface definitions for the search index provider and the content repository.
//!
//! These traits allow for dependency injection and swappable implementations.

mod record_repository;
mod search_index_provider;

pub use record_repository::RecordRepository;
pub use search_index_provider::SearchIndexProvider;
