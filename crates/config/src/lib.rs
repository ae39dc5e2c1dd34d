//! Libraring configuration
//!
//! Settings live in one `config.toml` in the platform config directory:
//!
//! ```toml
//! version = 1
//!
//! [app]
//! log_level = "warn"
//! color_output = true
//!
//! [catalog]
//! path = "/home/me/.local/share/libraring/library.json"
//! save_on_noop = false
//! backup_on_save = false
//! ```
//!
//! A missing file means defaults. Bad values are warnings when loading and
//! errors when saving. `LIBRARING_*` environment variables override the file.
//!
//! ```rust,no_run
//! use libraring_config::ConfigManager;
//!
//! let manager = ConfigManager::new().expect("no config directory");
//! let config = manager.load_with_env_overrides();
//! println!("Catalog file: {}", config.catalog.path.display());
//! ```

mod error;
mod file;
mod manager;
mod settings;
mod validation;

pub mod app_config;
mod catalog_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{
    apply_env_overrides, ConfigManager, ENV_APP_LOG_LEVEL, ENV_CATALOG_PATH,
    ENV_CATALOG_SAVE_ON_NOOP,
};
pub use settings::SETTING_KEYS;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use catalog_config::CatalogConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Application name used for platform directories and env var prefixes
pub const APP_NAME: &str = "libraring";

/// Everything in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    pub app: AppConfig,

    pub catalog: CatalogConfig,
}

impl Config {
    /// Every problem across all sections
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut problems = Vec::new();
        if let Err(mut e) = self.app.validate() {
            problems.append(&mut e);
        }
        if let Err(mut e) = self.catalog.validate() {
            problems.append(&mut e);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}
