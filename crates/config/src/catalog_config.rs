//! Catalog storage configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use crate::APP_NAME;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Relative fallback used when no platform data directory is available
const FALLBACK_CATALOG_PATH: &str = "data/library.json";

/// Where and how the catalog file is written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path of the JSON catalog file
    pub path: PathBuf,

    /// Rewrite the file even when a remove or status change found nothing to do
    pub save_on_noop: bool,

    /// Copy the previous catalog to `<file>.backup` before each overwrite
    pub backup_on_save: bool,
}

impl CatalogConfig {
    /// Platform default location of the catalog file
    ///
    /// - Linux: `~/.local/share/libraring/library.json`
    /// - macOS: `~/Library/Application Support/libraring/library.json`
    /// - Windows: `%APPDATA%\libraring\data\library.json`
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().join("library.json"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CATALOG_PATH))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            save_on_noop: false,
            backup_on_save: false,
        }
    }
}

impl ConfigSection for CatalogConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![Validator::path_not_empty(&self.path, "catalog.path")];

        if !self.path.as_os_str().is_empty() {
            results.push(Validator::not_directory(&self.path, "catalog.path"));
            results.push(Validator::has_extension(&self.path, "json", "catalog.path"));
        }

        Validator::collect_errors(results)
    }
}
