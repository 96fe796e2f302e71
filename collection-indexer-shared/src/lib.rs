//! # Collection Indexer Shared
//!
//! This crate defines shared data structures used across the collection indexer
//! ecosystem: repository records as the indexer reads them, the search field
//! definitions that drive generic element mapping, and the documents handed
//! to the search engine.

pub mod types;

pub use types::document::{Document, RESERVED_FIELDS};
pub use types::field_definition::FieldDefinition;
pub use types::record::{
    ContainerRef, MetadataEntry, Record, RecordKey, RecordKind, DUBLIN_CORE,
};
