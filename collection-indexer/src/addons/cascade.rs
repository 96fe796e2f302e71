//! Cascading resaves of addon records.
//!
//! Saving a record refreshes the documents of the records that depend on it:
//! its child records and the parents that embed its values as remote fields.
//! Every resaved dependent cascades further in both directions, the way a
//! save hook would. A visited set keeps every record to one resave per
//! cascade, so cyclic configurations terminate.

use std::collections::{HashSet, VecDeque};

use collection_indexer_repository::RecordRepository;
use collection_indexer_shared::{Record, RecordKey};
use tracing::{debug, warn};

use crate::addons::model::AddonConfig;
use crate::errors::CascadeFailure;

/// Longest chain of dependents followed from the originating record.
pub const MAX_CASCADE_DEPTH: usize = 16;

/// Outcome of one cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Records resaved, in resave order.
    pub resaved: Vec<RecordKey>,
    pub failures: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// First step of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Children,
    RemoteParents,
}

pub(crate) struct Cascade<'a> {
    addons: &'a [AddonConfig],
    repo: &'a dyn RecordRepository,
    visited: HashSet<RecordKey>,
    queue: VecDeque<(Record, usize)>,
    report: CascadeReport,
}

impl<'a> Cascade<'a> {
    pub(crate) fn new(addons: &'a [AddonConfig], repo: &'a dyn RecordRepository) -> Self {
        Self {
            addons,
            repo,
            visited: HashSet::new(),
            queue: VecDeque::new(),
            report: CascadeReport::default(),
        }
    }

    /// Resave the dependents of `origin` reached through `direction`, then
    /// theirs, breadth first.
    pub(crate) fn run(mut self, origin: &Record, direction: Direction) -> CascadeReport {
        self.visited.insert(origin.key());

        let first = match direction {
            Direction::Children => self.children_of(origin),
            Direction::RemoteParents => self.remote_parents_of(origin),
        };
        self.resave_all(origin, first, 1);

        while let Some((record, depth)) = self.queue.pop_front() {
            let mut dependents = self.children_of(&record);
            dependents.extend(self.remote_parents_of(&record));

            if depth >= MAX_CASCADE_DEPTH {
                // only a limit that drops a pending dependent is a failure
                let dropped = dependents
                    .iter()
                    .filter(|dependent| match dependent {
                        Ok(next) => !self.visited.contains(&next.key()),
                        Err(_) => true,
                    })
                    .count();
                if dropped > 0 {
                    warn!(
                        record = %record.key(),
                        depth = depth,
                        dropped = dropped,
                        "Cascade depth limit reached, not following dependents"
                    );
                    self.report.failures.push(CascadeFailure::new(
                        record.key(),
                        record.table(),
                        Some(record.id),
                        "cascade depth limit reached",
                    ));
                }
                continue;
            }

            self.resave_all(&record, dependents, depth + 1);
        }

        debug!(
            origin = %origin.key(),
            resaved = self.report.resaved.len(),
            failures = self.report.failures.len(),
            "Cascade completed"
        );
        self.report
    }

    fn resave_all(
        &mut self,
        source: &Record,
        dependents: Vec<Result<Record, CascadeFailure>>,
        depth: usize,
    ) {
        for dependent in dependents {
            match dependent {
                Ok(record) => self.resave(source, record, depth),
                Err(failure) => self.fail(failure),
            }
        }
    }

    fn resave(&mut self, source: &Record, record: Record, depth: usize) {
        let key = record.key();
        if !self.visited.insert(key.clone()) {
            return;
        }

        match self.repo.resave(&record) {
            Ok(()) => {
                debug!(source = %source.key(), record = %key, "Resaved dependent");
                self.report.resaved.push(key);
                self.queue.push_back((record, depth));
            }
            Err(e) => self.fail(CascadeFailure::new(
                source.key(),
                key.table,
                Some(key.id),
                e.to_string(),
            )),
        }
    }

    fn fail(&mut self, failure: CascadeFailure) {
        warn!(
            origin = %failure.origin,
            table = %failure.table,
            id = ?failure.id,
            reason = %failure.reason,
            "Cascade step failed"
        );
        self.report.failures.push(failure);
    }

    /// Records of the child tables of the addon governing `record`.
    fn children_of(&self, record: &Record) -> Vec<Result<Record, CascadeFailure>> {
        let Some(addon) = self.addons.iter().find(|a| a.table == record.table()) else {
            return Vec::new();
        };

        let mut dependents = Vec::new();
        for child in &addon.children {
            match self
                .repo
                .find_by_column(&child.table, &child.parent_key, record.id)
            {
                Ok(children) => dependents.extend(children.into_iter().map(Ok)),
                Err(e) => dependents.push(Err(CascadeFailure::new(
                    record.key(),
                    child.table.as_str(),
                    None,
                    format!("cannot load children by {}: {}", child.parent_key, e),
                ))),
            }
        }
        dependents
    }

    /// Parents embedding values of `record` as remote fields.
    ///
    /// Records of a table no addon governs have none.
    fn remote_parents_of(&self, record: &Record) -> Vec<Result<Record, CascadeFailure>> {
        if !self.addons.iter().any(|a| a.table == record.table()) {
            return Vec::new();
        }

        let mut dependents = Vec::new();
        for addon in self.addons {
            for field in addon.remote_fields_on(record.table()) {
                let Some(remote) = &field.remote else {
                    continue;
                };
                dependents.push(self.remote_parent(record, addon, &remote.key));
            }
        }
        dependents
    }

    fn remote_parent(
        &self,
        record: &Record,
        addon: &AddonConfig,
        key: &str,
    ) -> Result<Record, CascadeFailure> {
        let failure = |id: Option<i64>, reason: String| {
            CascadeFailure::new(record.key(), addon.table.as_str(), id, reason)
        };

        let parent_id = record
            .column_i64(key)
            .ok_or_else(|| failure(None, format!("missing parent column {}", key)))?;

        match self.repo.find(&addon.table, parent_id) {
            Ok(Some(parent)) => Ok(parent),
            Ok(None) => Err(failure(Some(parent_id), "parent does not exist".to_string())),
            Err(e) => Err(failure(Some(parent_id), e.to_string())),
        }
    }
}
