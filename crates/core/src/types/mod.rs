//! Domain types for Libraring
//!
//! - `book`: catalog entries and their identifiers
//! - `common`: shared traits and helpers

mod book;
mod common;

pub use book::{BookId, BookRecord, BookStatus};
pub use common::{eq_ignore_case, Validator};
