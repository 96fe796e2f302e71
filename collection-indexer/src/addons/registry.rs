//! The addon registry: cached addon configurations and the operations that
//! need them.

use std::path::{Path, PathBuf};

use collection_indexer_repository::RecordRepository;
use collection_indexer_shared::{Document, Record};
use tracing::{debug, info, instrument};

use crate::addons::cascade::{Cascade, CascadeReport, Direction};
use crate::addons::model::AddonConfig;
use crate::addons::parser::{AddonParser, JsonAddonParser};
use crate::errors::{ConfigError, MappingError};
use crate::mapper::AddonMapper;

/// Whether `record` currently belongs in the index.
///
/// Records of an addon with a `flag` column are indexable only while that
/// column is truthy; records of other addons always are.
pub fn is_indexable(record: &Record, addon: &AddonConfig) -> bool {
    match &addon.flag {
        Some(flag) => record.column_truthy(flag),
        None => true,
    }
}

/// Loads addon configurations on first use and answers every question that
/// depends on them.
///
/// The cache is only filled by [`parse_all`](Self::parse_all) and
/// [`merge_from`](Self::merge_from) and only emptied by
/// [`reset`](Self::reset). Lookups on an unparsed registry find nothing.
pub struct AddonRegistry<P: AddonParser = JsonAddonParser> {
    addon_dir: PathBuf,
    parser: P,
    addons: Option<Vec<AddonConfig>>,
}

impl AddonRegistry<JsonAddonParser> {
    /// Registry reading JSON addon sources from `addon_dir`.
    pub fn json(addon_dir: impl Into<PathBuf>) -> Self {
        Self::new(addon_dir, JsonAddonParser::new())
    }
}

impl<P: AddonParser> AddonRegistry<P> {
    pub fn new(addon_dir: impl Into<PathBuf>, parser: P) -> Self {
        Self {
            addon_dir: addon_dir.into(),
            parser,
            addons: None,
        }
    }

    pub fn addon_dir(&self) -> &Path {
        &self.addon_dir
    }

    /// Parse the addon directory unless already parsed.
    pub fn parse_all(&mut self) -> Result<&[AddonConfig], ConfigError> {
        if self.addons.is_none() {
            let parsed = self.parser.parse_dir(&self.addon_dir)?;
            info!(
                dir = %self.addon_dir.display(),
                addons = parsed.len(),
                "Addon registry initialized"
            );
            self.addons = Some(parsed);
        }
        Ok(self.addons.as_deref().unwrap_or_default())
    }

    /// Parse the addon directory with `parser` and append the result to the
    /// cache.
    ///
    /// Existing entries are kept, so a table may end up governed by two
    /// addons; lookups return the one registered first. A failed parse
    /// leaves the cache unchanged.
    pub fn merge_from(&mut self, parser: &dyn AddonParser) -> Result<&[AddonConfig], ConfigError> {
        let parsed = parser.parse_dir(&self.addon_dir)?;
        debug!(addons = parsed.len(), "Merging addons into registry");
        let addons = self.addons.get_or_insert_with(Vec::new);
        addons.extend(parsed);
        Ok(addons.as_slice())
    }

    /// Discard the cache; the next `parse_all` reparses.
    pub fn reset(&mut self) {
        self.addons = None;
    }

    pub fn is_parsed(&self) -> bool {
        self.addons.is_some()
    }

    pub fn addons(&self) -> Option<&[AddonConfig]> {
        self.addons.as_deref()
    }

    /// First registered addon governing `table`.
    pub fn addon_for_table(&self, table: &str) -> Option<&AddonConfig> {
        self.addons.as_ref()?.iter().find(|addon| addon.table == table)
    }

    /// First registered addon governing the table of `record`.
    pub fn find_addon_for_record(&self, record: &Record) -> Option<&AddonConfig> {
        self.addon_for_table(record.table())
    }

    /// Resave the child records of `record`, and theirs.
    #[instrument(skip_all, fields(record = %record.key()))]
    pub fn resave_children(&self, record: &Record, repo: &dyn RecordRepository) -> CascadeReport {
        Cascade::new(self.addons().unwrap_or_default(), repo).run(record, Direction::Children)
    }

    /// Resave the records embedding `record` as a remote field, and their
    /// dependents.
    #[instrument(skip_all, fields(record = %record.key()))]
    pub fn resave_remote_parent(
        &self,
        record: &Record,
        repo: &dyn RecordRepository,
    ) -> CascadeReport {
        Cascade::new(self.addons().unwrap_or_default(), repo).run(record, Direction::RemoteParents)
    }

    /// One document per indexable record of every addon.
    pub fn reindex_addons(
        &mut self,
        repo: &dyn RecordRepository,
        mapper: &AddonMapper,
    ) -> Result<Vec<Document>, MappingError> {
        let addons = self.parse_all()?;
        mapper.map_all(addons, repo)
    }

    /// The document of `record`, if an addon governs it and it is indexable.
    pub fn index_record(
        &mut self,
        record: &Record,
        repo: &dyn RecordRepository,
        mapper: &AddonMapper,
    ) -> Result<Option<Document>, MappingError> {
        self.parse_all()?;
        match self.find_addon_for_record(record) {
            Some(addon) if is_indexable(record, addon) => {
                Ok(Some(mapper.map(record, addon, repo)?))
            }
            _ => Ok(None),
        }
    }

    /// Document id of `record` under its addon.
    pub fn get_id(&mut self, record: &Record) -> Result<Option<String>, ConfigError> {
        self.parse_all()?;
        Ok(self
            .find_addon_for_record(record)
            .map(|addon| format!("{}_{}", addon.table, record.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addons::model::FieldConfig;
    use crate::uri::UriResolver;
    use collection_indexer_repository::MemoryRepository;
    use collection_indexer_shared::RecordKind;
    use std::cell::Cell;

    /// Parser returning fixed addons and counting its calls.
    struct StaticParser {
        addons: Vec<AddonConfig>,
        calls: Cell<usize>,
    }

    impl StaticParser {
        fn new(addons: Vec<AddonConfig>) -> Self {
            Self {
                addons,
                calls: Cell::new(0),
            }
        }
    }

    impl AddonParser for StaticParser {
        fn parse_dir(&self, _dir: &Path) -> Result<Vec<AddonConfig>, ConfigError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.addons.clone())
        }
    }

    struct FailingParser;

    impl AddonParser for FailingParser {
        fn parse_dir(&self, dir: &Path) -> Result<Vec<AddonConfig>, ConfigError> {
            Err(ConfigError::malformed(dir, "broken"))
        }
    }

    fn exhibit_addon() -> AddonConfig {
        AddonConfig::new("Exhibit")
            .with_flag("public")
            .with_field(FieldConfig::new("title").indexed(true))
    }

    fn registry() -> AddonRegistry<StaticParser> {
        AddonRegistry::new("addons", StaticParser::new(vec![exhibit_addon()]))
    }

    fn mapper() -> AddonMapper {
        AddonMapper::new(UriResolver::new("http://museum.example"))
    }

    #[test]
    fn test_parse_all_caches() {
        let mut registry = registry();
        assert!(!registry.is_parsed());

        assert_eq!(registry.parse_all().unwrap().len(), 1);
        assert_eq!(registry.parse_all().unwrap().len(), 1);
        assert_eq!(registry.parser.calls.get(), 1);

        registry.reset();
        assert!(!registry.is_parsed());
        registry.parse_all().unwrap();
        assert_eq!(registry.parser.calls.get(), 2);
    }

    #[test]
    fn test_lookup_before_parse_finds_nothing() {
        let registry = registry();
        let exhibit = Record::new(RecordKind::Exhibit, 1);
        assert!(registry.find_addon_for_record(&exhibit).is_none());
    }

    #[test]
    fn test_merge_appends_and_first_match_wins() {
        let mut registry = registry();
        registry.parse_all().unwrap();

        let duplicate = AddonConfig::new("Exhibit").with_result_type("Duplicate");
        let other = AddonConfig::new("Essay");
        let addons = registry
            .merge_from(&StaticParser::new(vec![duplicate, other]))
            .unwrap();
        assert_eq!(addons.len(), 3);

        let exhibit = Record::new(RecordKind::Exhibit, 1);
        let addon = registry.find_addon_for_record(&exhibit).unwrap();
        assert_eq!(addon.result_type(), "Exhibit");
        assert!(registry.addon_for_table("Essay").is_some());
        assert!(registry.addon_for_table("Unknown").is_none());
    }

    #[test]
    fn test_merge_into_unparsed_registry() {
        let mut registry = registry();
        registry
            .merge_from(&StaticParser::new(vec![AddonConfig::new("Essay")]))
            .unwrap();

        // the merged collection now counts as parsed
        assert_eq!(registry.parse_all().unwrap().len(), 1);
        assert_eq!(registry.parser.calls.get(), 0);
    }

    #[test]
    fn test_failed_merge_leaves_cache() {
        let mut registry = registry();
        registry.parse_all().unwrap();

        assert!(registry.merge_from(&FailingParser).is_err());
        assert_eq!(registry.addons().unwrap().len(), 1);
    }

    #[test]
    fn test_get_id() {
        let mut registry = registry();
        let exhibit = Record::new(RecordKind::Exhibit, 12);
        let item = Record::new(RecordKind::Item, 12);

        assert_eq!(registry.get_id(&exhibit).unwrap().as_deref(), Some("Exhibit_12"));
        assert_eq!(registry.get_id(&exhibit).unwrap().as_deref(), Some("Exhibit_12"));
        assert_eq!(registry.get_id(&item).unwrap(), None);
    }

    #[test]
    fn test_index_record_respects_flag() {
        let mut registry = registry();
        let repo = MemoryRepository::new();
        let public = Record::new(RecordKind::Exhibit, 1)
            .with_slug("open")
            .with_column("public", 1)
            .with_column("title", "Open");
        let private = Record::new(RecordKind::Exhibit, 2)
            .with_slug("closed")
            .with_column("public", 0);
        let item = Record::new(RecordKind::Item, 1);

        let doc = registry.index_record(&public, &repo, &mapper()).unwrap().unwrap();
        assert_eq!(Some(doc.id.clone()), registry.get_id(&public).unwrap());
        assert_eq!(doc.multi("title_t"), ["Open"]);

        assert!(registry.index_record(&private, &repo, &mapper()).unwrap().is_none());
        assert!(registry.index_record(&item, &repo, &mapper()).unwrap().is_none());
    }

    #[test]
    fn test_index_record_propagates_config_error() {
        let mut registry = AddonRegistry::new("addons", FailingParser);
        let record = Record::new(RecordKind::Exhibit, 1);

        let result = registry.index_record(&record, &MemoryRepository::new(), &mapper());

        assert!(matches!(result, Err(MappingError::Config(_))));
        assert!(!registry.is_parsed());
    }

    #[test]
    fn test_is_indexable() {
        let flagged = AddonConfig::new("Exhibit").with_flag("public");
        let unflagged = AddonConfig::new("Exhibit");
        let record = Record::new(RecordKind::Exhibit, 1).with_public(false);

        assert!(!is_indexable(&record, &flagged));
        assert!(is_indexable(&record, &unflagged));
        assert!(is_indexable(&record.clone().with_column("public", "1"), &flagged));
    }
}
