//! Reading and writing `config.toml`
//!
//! Writes validate first, copy the previous file to `config.toml.backup`, then
//! replace the file through a temporary sibling so it is never half written.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub(crate) struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("toml.backup")
    }

    /// Parses the file; `Ok(None)` when there is none yet
    ///
    /// Settings that parse but fail validation are logged, not rejected, so a
    /// stale value does not lock the user out of the catalog.
    pub fn read(&self) -> ConfigResult<Option<Config>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Err(ConfigError::EmptyFile {
                path: self.path.clone(),
            });
        }

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "{} has format version {}, this build knows {}",
                self.path.display(),
                config.version,
                CONFIG_VERSION
            );
        }
        if let Err(problems) = config.validate() {
            for problem in &problems {
                log::warn!("{}: {}", self.path.display(), problem);
            }
        }

        Ok(Some(config))
    }

    /// Replaces the file with `config`
    pub fn write(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|problems| ConfigError::Invalid { problems })?;
        let text = toml::to_string_pretty(config)?;

        let dir = self.dir();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
            log::info!("Created config directory {}", dir.display());
        }

        if self.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|source| ConfigError::Write {
                path: backup,
                source,
            })?;
        }

        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(text.as_bytes()).map_err(write_error)?;
        temp.flush().map_err(write_error)?;
        temp.persist(&self.path).map_err(|e| write_error(e.error))?;

        log::info!("Wrote {}", self.path.display());
        Ok(())
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}
