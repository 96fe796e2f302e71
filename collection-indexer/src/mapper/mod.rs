//! Mapping of records into search documents.
//!
//! Items go through [`ItemMapper`]: system fields, the domain facet rules of
//! [`extraction`] and the catalogued elements of [`elements`]. Records of
//! addon tables go through [`AddonMapper`].

pub mod addon;
pub mod buckets;
pub mod elements;
pub mod extraction;
pub mod item;

pub use addon::AddonMapper;
pub use elements::FieldCatalog;
pub use item::{ItemMapper, MappedDocument, MapperConfig};
