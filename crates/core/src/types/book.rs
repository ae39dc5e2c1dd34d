//! Book record domain model

use crate::error::AppError;
use crate::types::{eq_ignore_case, Validator};
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a book within one catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    /// First id handed out by an empty catalog
    pub const FIRST: Self = Self(1);

    /// Creates a BookId from a raw value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one, or `None` past `u64::MAX`
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Ids are positive; zero only shows up in hand-edited files
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(AppError::InvalidId {
                value: trimmed.to_string(),
            }),
        }
    }
}

/// Availability of a catalog entry
///
/// Serialized with the literals used by existing catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    #[serde(rename = "в наличии", alias = "available")]
    Available,
    #[serde(rename = "выдана", alias = "checked_out")]
    CheckedOut,
}

impl BookStatus {
    /// All statuses, in menu order
    pub const ALL: [BookStatus; 2] = [BookStatus::Available, BookStatus::CheckedOut];

    /// Literal written to the catalog file
    pub fn as_literal(&self) -> &'static str {
        match self {
            Self::Available => "в наличии",
            Self::CheckedOut => "выдана",
        }
    }

    /// The other status
    pub fn opposite(&self) -> Self {
        match self {
            Self::Available => Self::CheckedOut,
            Self::CheckedOut => Self::Available,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::CheckedOut => write!(f, "checked out"),
        }
    }
}

impl FromStr for BookStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "в наличии" | "available" => Ok(Self::Available),
            "выдана" | "checked out" | "checked-out" | "checked_out" | "checkedout" => {
                Ok(Self::CheckedOut)
            }
            _ => Err(AppError::InvalidStatus {
                value: s.trim().to_string(),
            }),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: BookStatus,
    pub count: u32,
}

impl BookRecord {
    /// Creates a record holding a single available copy
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: BookStatus::Available,
            count: 1,
        }
    }

    /// Returns true if at least one copy is on the shelf
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Whole-value match on title, author and year, ignoring case
    pub fn matches(&self, title: &str, author: &str, year: i32) -> bool {
        self.year == year && eq_ignore_case(&self.title, title) && eq_ignore_case(&self.author, author)
    }

    /// Hands out one copy
    ///
    /// Returns false when no copies are left; the record is unchanged then.
    pub fn check_out(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            self.status = BookStatus::CheckedOut;
        }
        true
    }

    /// Puts one copy back on the shelf
    ///
    /// The count saturates at `u32::MAX`.
    pub fn return_copy(&mut self) {
        self.count = self.count.saturating_add(1);
        self.status = BookStatus::Available;
    }

    /// Derives status from count
    ///
    /// Returns true if the status had to be corrected.
    pub fn reconcile(&mut self) -> bool {
        let expected = if self.count == 0 {
            BookStatus::CheckedOut
        } else {
            BookStatus::Available
        };
        if self.status == expected {
            return false;
        }
        self.status = expected;
        true
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Year: {}, Status: {}, Copies: {}",
            self.id, self.title, self.author, self.year, self.status, self.count
        )
    }
}

impl Validator for BookRecord {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.id.is_valid() {
            errors.push("ID must be positive".to_string());
        }

        if let Err(e) = validation::validate_title(&self.title) {
            errors.push(e.user_message());
        }

        if let Err(e) = validation::validate_author(&self.author) {
            errors.push(e.user_message());
        }

        if let Err(e) = validation::check_year(self.year) {
            errors.push(e.user_message());
        }

        if (self.count == 0) != (self.status == BookStatus::CheckedOut) {
            errors.push("Status does not match the number of copies".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
