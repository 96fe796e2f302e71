//! In-memory implementation of the record repository.
//!
//! This module provides a `RecordRepository` backed by a JSON snapshot of the
//! content repository. It is used by the command line tool and by tests.

mod memory_repository;

pub use memory_repository::{MemoryRepository, RepositorySnapshot};
