//! Addon configuration parsing.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::addons::model::AddonConfig;
use crate::errors::ConfigError;

/// Reads every addon source of a directory.
///
/// Implementations return the addons in registration order. A malformed
/// source aborts the whole parse.
pub trait AddonParser {
    fn parse_dir(&self, dir: &Path) -> Result<Vec<AddonConfig>, ConfigError>;
}

/// Parser of JSON addon sources, one addon per `*.json` file.
///
/// Files are read in file name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAddonParser;

impl JsonAddonParser {
    pub fn new() -> Self {
        Self
    }

    fn source_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let entries = fs::read_dir(dir).map_err(|e| ConfigError::io(dir, e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ConfigError::io(dir, e.to_string()))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn parse_file(path: &Path) -> Result<AddonConfig, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e.to_string()))?;
        let addon: AddonConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::malformed(path, e.to_string()))?;
        validate(&addon).map_err(|message| ConfigError::invalid(path, message))?;
        Ok(addon)
    }
}

impl AddonParser for JsonAddonParser {
    fn parse_dir(&self, dir: &Path) -> Result<Vec<AddonConfig>, ConfigError> {
        let mut addons = Vec::new();
        let mut tables = HashSet::new();

        for path in Self::source_files(dir)? {
            let addon = Self::parse_file(&path)?;
            if !tables.insert(addon.table.clone()) {
                return Err(ConfigError::duplicate_table(addon.table, &path));
            }
            debug!(path = %path.display(), table = %addon.table, "Parsed addon source");
            addons.push(addon);
        }

        info!(dir = %dir.display(), addons = addons.len(), "Parsed addon directory");
        Ok(addons)
    }
}

/// Check the rules serde cannot express.
fn validate(addon: &AddonConfig) -> Result<(), String> {
    non_empty("table", &addon.table)?;

    for field in &addon.fields {
        non_empty("field name", &field.name)?;
        if let Some(remote) = &field.remote {
            non_empty("remote table", &remote.table)?;
            non_empty("remote key", &remote.key)?;
        }
    }

    for child in &addon.children {
        non_empty("child table", &child.table)?;
        non_empty("child parent_key", &child.parent_key)?;
    }

    if let Some(title) = &addon.title {
        if addon.field(title).is_none() {
            return Err(format!("title field {:?} is not declared", title));
        }
    }

    Ok(())
}

fn non_empty(what: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", what))
    } else {
        Ok(())
    }
}
