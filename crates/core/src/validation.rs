//! Field validators for user-supplied book data
//!
//! The catalog trusts its inputs; these run first, at the prompt or on CLI
//! arguments. Lengths are counted in characters, not bytes.

use crate::error::{AppError, Field, Result};
use crate::types::BookId;
use chrono::Datelike;

/// Longest accepted title
pub const MAX_TITLE_CHARS: usize = 100;

/// Longest accepted author name
pub const MAX_AUTHOR_CHARS: usize = 50;

/// Current calendar year in local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Validates a title and returns it trimmed
pub fn validate_title(input: &str) -> Result<String> {
    let title = input.trim();
    if title.is_empty() {
        return Err(AppError::invalid_field(Field::Title, "Title cannot be empty."));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::invalid_field(
            Field::Title,
            format!("Title must not exceed {} characters.", MAX_TITLE_CHARS),
        ));
    }
    Ok(title.to_string())
}

/// Validates an author name and returns it trimmed
///
/// Only letters (any script) and whitespace are allowed.
pub fn validate_author(input: &str) -> Result<String> {
    let author = input.trim();
    if author.is_empty() {
        return Err(AppError::invalid_field(Field::Author, "Author cannot be empty."));
    }
    if author.chars().count() > MAX_AUTHOR_CHARS {
        return Err(AppError::invalid_field(
            Field::Author,
            format!("Author must not exceed {} characters.", MAX_AUTHOR_CHARS),
        ));
    }
    if !author.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Err(AppError::invalid_field(
            Field::Author,
            "Author may only contain letters and spaces.",
        ));
    }
    Ok(author.to_string())
}

/// Parses and validates a publication year
pub fn validate_year(input: &str) -> Result<i32> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(AppError::invalid_field(Field::Year, "Year cannot be empty."));
    }
    let year = raw
        .parse::<i32>()
        .map_err(|_| AppError::invalid_field(Field::Year, "Year must be a number."))?;
    check_year(year)
}

/// Checks that an already-parsed year lies in `1..=current_year()`
pub fn check_year(year: i32) -> Result<i32> {
    let max = current_year();
    if year <= 0 || year > max {
        return Err(AppError::invalid_field(
            Field::Year,
            format!("Year must be between 1 and {}.", max),
        ));
    }
    Ok(year)
}

/// Parses a book id typed by the user
pub fn validate_id(input: &str) -> Result<BookId> {
    input.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_success() {
        assert_eq!(validate_title("Valid Title").unwrap(), "Valid Title");
        assert_eq!(validate_title("  padded  ").unwrap(), "padded");
        let longest = "A".repeat(MAX_TITLE_CHARS);
        assert_eq!(validate_title(&longest).unwrap(), longest);
    }

    #[test]
    fn test_validate_title_errors() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"A".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_title_length_counts_characters() {
        let cyrillic = "Я".repeat(MAX_TITLE_CHARS);
        assert!(validate_title(&cyrillic).is_ok());
    }

    #[test]
    fn test_validate_author_success() {
        assert_eq!(validate_author("John Doe").unwrap(), "John Doe");
        assert_eq!(validate_author("Иван Иванов").unwrap(), "Иван Иванов");
        assert!(validate_author(&"A".repeat(MAX_AUTHOR_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_author_errors() {
        let err = validate_author("").unwrap_err();
        assert_eq!(err.user_message(), "Author cannot be empty.");

        assert!(validate_author(&"A".repeat(MAX_AUTHOR_CHARS + 1)).is_err());

        let err = validate_author("John123").unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidField {
                field: Field::Author,
                ..
            }
        ));
        assert!(validate_author("O'Brien").is_err());
    }

    #[test]
    fn test_validate_year_success() {
        assert_eq!(validate_year("1").unwrap(), 1);
        assert_eq!(validate_year("2023").unwrap(), 2023);
        assert_eq!(validate_year(&current_year().to_string()).unwrap(), current_year());
    }

    #[test]
    fn test_validate_year_errors() {
        assert_eq!(
            validate_year("").unwrap_err().user_message(),
            "Year cannot be empty."
        );
        assert_eq!(
            validate_year("abc").unwrap_err().user_message(),
            "Year must be a number."
        );
        assert!(validate_year("0").is_err());
        assert!(validate_year("-1").is_err());
        assert!(validate_year(&(current_year() + 1).to_string()).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("42").unwrap(), BookId::new(42));
        assert!(matches!(
            validate_id("abc"),
            Err(AppError::InvalidId { .. })
        ));
        assert!(validate_id("").is_err());
    }
}
