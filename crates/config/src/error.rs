//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory, so no platform config directory either
    #[error("Could not find a config directory for this user; pass --config-dir")]
    NoConfigDirectory,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is empty; delete it or run init-config")]
    EmptyFile { path: PathBuf },

    #[error("{path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {}", join_problems(.problems))]
    Invalid { problems: Vec<ValidationError> },

    #[error("Unknown setting '{key}' (known: {})", crate::SETTING_KEYS.join(", "))]
    UnknownKey { key: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<ValidationError> for ConfigError {
    fn from(problem: ValidationError) -> Self {
        Self::Invalid {
            problems: vec![problem],
        }
    }
}

fn join_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A rejected value for one setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted setting name, e.g. "catalog.path"
    pub field: String,
    pub message: String,
    /// The rejected value, if there was one
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.to_string()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)?;
        if let Some(value) = &self.value {
            write!(f, " (got '{}')", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("catalog.path", "must not be empty");
        assert_eq!(err.to_string(), "catalog.path must not be empty");
    }

    #[test]
    fn test_validation_error_with_value() {
        let err = ValidationError::with_value("app.log_level", "is not a log level", "loud");
        assert_eq!(err.to_string(), "app.log_level is not a log level (got 'loud')");
    }

    #[test]
    fn test_invalid_lists_every_problem() {
        let err = ConfigError::Invalid {
            problems: vec![
                ValidationError::new("catalog.path", "must not be empty"),
                ValidationError::new("app.banner", "is too long"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: catalog.path must not be empty; app.banner is too long"
        );
    }

    #[test]
    fn test_unknown_key_names_the_known_ones() {
        let err = ConfigError::UnknownKey {
            key: "catalog.colour".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Unknown setting 'catalog.colour'"));
        assert!(message.contains("catalog.save_on_noop"));
    }
}
