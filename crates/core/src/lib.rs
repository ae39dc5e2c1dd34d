pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{AppError, Field, Result};
pub use types::{eq_ignore_case, BookId, BookRecord, BookStatus, Validator};
