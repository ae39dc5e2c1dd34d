//! Checks applied to configuration values

pub use crate::error::ValidationError;
use std::path::Path;

/// A `[section]` of `config.toml`
pub trait ConfigSection: Default {
    /// Every problem with the section's current values
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a path is set
    pub fn path_not_empty(path: &Path, field: &str) -> Result<(), ValidationError> {
        if path.as_os_str().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a path, if it exists, is not a directory
    pub fn not_directory(path: &Path, field: &str) -> Result<(), ValidationError> {
        if path.is_dir() {
            Err(ValidationError::with_value(
                field,
                "must point to a file, not a directory",
                path.display(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a file name ends with the given extension
    pub fn has_extension(path: &Path, extension: &str, field: &str) -> Result<(), ValidationError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(extension) => Ok(()),
            _ => Err(ValidationError::with_value(
                field,
                format!("must have a .{} extension", extension),
                path.display(),
            )),
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
