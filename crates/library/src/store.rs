//! JSON file persistence for the catalog
//!
//! The whole catalog is one pretty-printed JSON array. Saves go through a
//! temporary file in the same directory which is then renamed over the target,
//! so a crash mid-write leaves the previous catalog intact.

use crate::error::{LibraryError, Result};
use libraring_core::BookRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Something went wrong reading the catalog, but the catalog still opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// File was blank or held malformed JSON; the catalog started empty
    Corrupt {
        reason: String,
        /// Copy of the unreadable file, if one could be made
        preserved_at: Option<PathBuf>,
    },
    /// Records with id 0 or an id already taken were given fresh ids
    IdsReassigned { count: usize },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt {
                reason,
                preserved_at: Some(copy),
            } => write!(
                f,
                "catalog file is corrupted ({}); starting empty, original kept at {}",
                reason,
                copy.display()
            ),
            Self::Corrupt {
                reason,
                preserved_at: None,
            } => write!(
                f,
                "catalog file is corrupted ({}); starting empty, it will be overwritten on the next change",
                reason
            ),
            Self::IdsReassigned { count } => write!(
                f,
                "{} book(s) had a missing or duplicate id and were given new ids",
                count
            ),
        }
    }
}

/// Result of reading the catalog file
#[derive(Debug, Default)]
pub struct Snapshot {
    pub records: Vec<BookRecord>,
    pub warning: Option<LoadWarning>,
}

/// Reads and writes the catalog file
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    backup_on_save: bool,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_on_save: false,
        }
    }

    /// Copy the previous file to `<file>.backup` before each overwrite
    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup_on_save = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "backup")
    }

    pub fn corrupt_copy_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "corrupt")
    }

    /// Loads every record from the file
    ///
    /// A missing file yields an empty snapshot. A blank file or malformed JSON
    /// also yields an empty snapshot, with a warning; the bad file is copied
    /// aside first so the next save does not destroy it. Any other read failure
    /// is an error.
    pub fn load(&self) -> Result<Snapshot> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "Catalog file not found at {}, starting empty",
                    self.path.display()
                );
                return Ok(Snapshot::default());
            }
            Err(e) => {
                return Err(LibraryError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if contents.trim().is_empty() {
            log::warn!("Catalog file {} is blank", self.path.display());
            return Ok(self.unreadable("file is empty".to_string()));
        }

        match serde_json::from_str::<Vec<BookRecord>>(&contents) {
            Ok(records) => {
                log::debug!(
                    "Loaded {} records from {}",
                    records.len(),
                    self.path.display()
                );
                Ok(Snapshot {
                    records,
                    warning: None,
                })
            }
            Err(e) => {
                log::error!(
                    "Catalog file {} is not valid: {}",
                    self.path.display(),
                    e
                );
                Ok(self.unreadable(e.to_string()))
            }
        }
    }

    fn unreadable(&self, reason: String) -> Snapshot {
        let preserved_at = self.preserve_corrupt_file();
        Snapshot {
            records: Vec::new(),
            warning: Some(LoadWarning::Corrupt {
                reason,
                preserved_at,
            }),
        }
    }

    /// Overwrites the file with `records`
    pub fn save(&self, records: &[BookRecord]) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| LibraryError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
                log::info!("Created catalog directory: {}", parent.display());
            }
        }

        if self.backup_on_save && self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|e| LibraryError::Write {
                path: backup.clone(),
                source: e,
            })?;
            log::debug!("Backed up catalog to {}", backup.display());
        }

        let json = to_pretty_json(records)?;
        self.write_atomic(&json)?;

        log::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn write_atomic(&self, content: &[u8]) -> Result<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir)?;

        temp_file.write_all(content)?;
        temp_file.flush()?;

        temp_file
            .persist(&self.path)
            .map_err(|e| LibraryError::Write {
                path: self.path.clone(),
                source: e.error,
            })?;

        Ok(())
    }

    fn preserve_corrupt_file(&self) -> Option<PathBuf> {
        let copy = self.corrupt_copy_path();
        match fs::copy(&self.path, &copy) {
            Ok(_) => {
                log::warn!("Kept unreadable catalog at {}", copy.display());
                Some(copy)
            }
            Err(e) => {
                log::warn!("Could not keep a copy of the unreadable catalog: {}", e);
                None
            }
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

/// Serializes with four-space indentation, non-ASCII kept verbatim
fn to_pretty_json(records: &[BookRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
