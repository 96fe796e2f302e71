//! This module defines the core data structures and types used across the indexer.
//! It re-exports specific types like `Record` and `Document`.

pub mod document;
pub mod field_definition;
pub mod record;

pub use document::{Document, RESERVED_FIELDS};
pub use field_definition::FieldDefinition;
pub use record::{ContainerRef, MetadataEntry, Record, RecordKey, RecordKind};
