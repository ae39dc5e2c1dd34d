//! Common traits and helpers shared across domain models

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Case-insensitive equality using full Unicode lowercasing
///
/// Catalog matching is whole-value: "Dune" matches "dune" but not "Dune Messiah".
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && a.to_lowercase() == b.to_lowercase()
}
