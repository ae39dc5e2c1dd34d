//! Locating, loading and editing `config.toml`

use crate::file::ConfigFile;
use crate::{Config, ConfigError, ConfigResult, APP_NAME};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `catalog.path`
pub const ENV_CATALOG_PATH: &str = "LIBRARING_CATALOG_PATH";
/// Environment variable overriding `catalog.save_on_noop`
pub const ENV_CATALOG_SAVE_ON_NOOP: &str = "LIBRARING_CATALOG_SAVE_ON_NOOP";
/// Environment variable overriding `app.log_level`
pub const ENV_APP_LOG_LEVEL: &str = "LIBRARING_APP_LOG_LEVEL";

/// Environment variables and the settings they replace
const ENV_OVERRIDES: [(&str, &str); 3] = [
    (ENV_CATALOG_PATH, "catalog.path"),
    (ENV_CATALOG_SAVE_ON_NOOP, "catalog.save_on_noop"),
    (ENV_APP_LOG_LEVEL, "app.log_level"),
];

const CONFIG_FILE_NAME: &str = "config.toml";

pub struct ConfigManager {
    dir: PathBuf,
    file: ConfigFile,
}

impl ConfigManager {
    /// Uses the platform config directory
    ///
    /// - Linux: `~/.config/libraring/`
    /// - macOS: `~/Library/Application Support/libraring/`
    /// - Windows: `%APPDATA%\libraring\config\`
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoConfigDirectory)?;
        Ok(Self::with_directory(dirs.config_dir()))
    }

    pub fn with_directory(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let file = ConfigFile::new(dir.join(CONFIG_FILE_NAME));
        Self { dir, file }
    }

    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the file, or returns defaults if there is none
    pub fn load(&self) -> ConfigResult<Config> {
        Ok(self.file.read()?.unwrap_or_default())
    }

    /// Settings the program runs with: the file, then `LIBRARING_*` variables
    ///
    /// An unreadable file is logged and replaced by defaults so the catalog
    /// stays usable.
    pub fn load_with_env_overrides(&self) -> Config {
        let mut config = self.load().unwrap_or_else(|e| {
            log::warn!("{}; using default settings", e);
            Config::default()
        });
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        config
    }

    /// Writes a default file unless one exists
    ///
    /// Returns true if a file was written.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.file.exists() {
            log::info!("{} already exists", self.config_path().display());
            return Ok(false);
        }
        self.file.write(&Config::default())?;
        Ok(true)
    }

    /// Changes one setting in the file and returns the saved config
    ///
    /// Environment overrides are not applied, so they never leak into the
    /// file. Nothing is written if the value is rejected.
    pub fn set(&self, key: &str, value: &str) -> ConfigResult<Config> {
        let mut config = self.load()?;
        config.set(key, value)?;
        self.file.write(&config)?;
        Ok(config)
    }
}

/// Applies `LIBRARING_*` overrides found through `lookup`
///
/// Values `Config::set` rejects are logged and skipped.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in ENV_OVERRIDES {
        let Some(value) = lookup(var) else {
            continue;
        };
        match config.set(key, &value) {
            Ok(()) => log::debug!("{} set from {}", key, var),
            Err(e) => log::warn!("Ignoring {}: {}", var, e),
        }
    }
}
