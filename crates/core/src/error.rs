//! Error types for Libraring domain input
//!
//! Everything here is a *user* error: bad field values typed at a prompt,
//! an unknown status literal, an id that does not parse. None of them leave
//! the catalog in a modified state, so the shell reports them and carries on.

use std::fmt;
use thiserror::Error;

/// Book fields that go through validation before they reach the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Year,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Author => write!(f, "author"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Main error type for Libraring domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A title, author or year failed its format rules
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: Field, reason: String },

    /// Status literal is not one of the known values
    #[error("Invalid status: '{value}'")]
    InvalidStatus { value: String },

    /// Book id is not a positive integer
    #[error("Invalid book id: '{value}'")]
    InvalidId { value: String },
}

impl AppError {
    /// Helper to create a field error
    pub fn invalid_field(field: Field, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly error message suitable for a prompt
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidField { reason, .. } => reason.clone(),
            Self::InvalidStatus { .. } => {
                "Unknown status. Allowed values: 'available', 'checked out'.".to_string()
            }
            Self::InvalidId { .. } => "Book ID must be a positive number.".to_string(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Title.to_string(), "title");
        assert_eq!(Field::Author.to_string(), "author");
        assert_eq!(Field::Year.to_string(), "year");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::invalid_field(Field::Title, "Title cannot be empty.");
        assert_eq!(err.to_string(), "Invalid title: Title cannot be empty.");

        let err = AppError::InvalidStatus {
            value: "lost".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid status: 'lost'");
    }

    #[test]
    fn test_user_messages_are_friendly() {
        let err = AppError::invalid_field(Field::Year, "Year must be a number.");
        assert_eq!(err.user_message(), "Year must be a number.");

        let err = AppError::InvalidId {
            value: "abc".to_string(),
        };
        assert!(err.user_message().contains("positive number"));

        let err = AppError::InvalidStatus {
            value: "gone".to_string(),
        };
        assert!(err.user_message().contains("available"));
    }

    #[test]
    fn test_result_type_alias() {
        fn test_function() -> Result<i32> {
            Err(AppError::InvalidId {
                value: "0".to_string(),
            })
        }
        assert!(test_function().is_err());
    }
}
