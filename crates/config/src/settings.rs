//! Individual settings addressed by dotted name
//!
//! Used by `libraring config set` and by the environment overrides, so both
//! accept the same spellings.

use crate::{Config, ConfigError, ConfigResult, ValidationError};
use std::path::PathBuf;

/// Every setting `Config::set` and `Config::get` understand
pub const SETTING_KEYS: [&str; 6] = [
    "app.log_level",
    "app.color_output",
    "app.banner",
    "catalog.path",
    "catalog.save_on_noop",
    "catalog.backup_on_save",
];

impl Config {
    /// Parses `value` and stores it under `key`
    ///
    /// On error the config is left as it was.
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "app.log_level" => self.app.log_level = value.parse()?,
            "app.color_output" => self.app.color_output = parse_flag(key, value)?,
            "app.banner" => self.app.banner = value.to_string(),
            "catalog.path" => {
                let path = value.trim();
                if path.is_empty() {
                    return Err(ValidationError::new(key, "must not be empty").into());
                }
                self.catalog.path = PathBuf::from(path);
            }
            "catalog.save_on_noop" => self.catalog.save_on_noop = parse_flag(key, value)?,
            "catalog.backup_on_save" => self.catalog.backup_on_save = parse_flag(key, value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Current value of `key`, formatted the way `set` accepts it
    pub fn get(&self, key: &str) -> ConfigResult<String> {
        let value = match key {
            "app.log_level" => self.app.log_level.to_string(),
            "app.color_output" => self.app.color_output.to_string(),
            "app.banner" => self.app.banner.clone(),
            "catalog.path" => self.catalog.path.display().to_string(),
            "catalog.save_on_noop" => self.catalog.save_on_noop.to_string(),
            "catalog.backup_on_save" => self.catalog.backup_on_save.to_string(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        };
        Ok(value)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ValidationError::with_value(key, "must be true or false", value)),
    }
}
