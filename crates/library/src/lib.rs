//! Libraring catalog management
//!
//! The [`Catalog`] owns the book records and keeps the JSON file behind it
//! up to date; [`CatalogStore`] does the file I/O.

pub mod catalog;
pub mod error;
pub mod store;

pub use catalog::{Catalog, CatalogStats, SearchQuery};
pub use error::{LibraryError, LibraryResult};
pub use store::{CatalogStore, LoadWarning, Snapshot};

use libraring_config::CatalogConfig;
use std::path::PathBuf;

/// How a catalog is opened
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// JSON catalog file
    pub path: PathBuf,
    /// Rewrite the file even when an operation found nothing to change
    pub save_on_noop: bool,
    /// Keep `<file>.backup` with the previous contents
    pub backup_on_save: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

impl CatalogOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_on_noop: false,
            backup_on_save: false,
        }
    }

    pub fn with_save_on_noop(mut self, enabled: bool) -> Self {
        self.save_on_noop = enabled;
        self
    }

    pub fn with_backup_on_save(mut self, enabled: bool) -> Self {
        self.backup_on_save = enabled;
        self
    }
}

impl From<&CatalogConfig> for CatalogOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            path: config.path.clone(),
            save_on_noop: config.save_on_noop,
            backup_on_save: config.backup_on_save,
        }
    }
}
