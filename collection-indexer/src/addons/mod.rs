//! Addons: declarative indexing configuration of secondary tables.
//!
//! - [`model`]: the configuration types
//! - [`parser`]: reading configuration sources
//! - [`registry`]: the cached configuration and the operations built on it
//! - [`cascade`]: resave propagation between dependent records

pub mod cascade;
pub mod model;
pub mod parser;
pub mod registry;

pub use cascade::{CascadeReport, MAX_CASCADE_DEPTH};
pub use model::{AddonConfig, ChildConfig, FieldConfig, RemoteConfig};
pub use parser::{AddonParser, JsonAddonParser};
pub use registry::{is_indexable, AddonRegistry};
