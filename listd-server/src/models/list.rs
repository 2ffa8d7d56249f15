//! List name validation

use super::validation::{validate_name, ValidationError};

/// Validated list name (non-blank, at most 255 characters).
///
/// Uniqueness is enforced by the database, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListName(String);

impl ListName {
    /// Create a new list name.
    ///
    /// # Example
    /// ```
    /// use listd_server::models::ListName;
    ///
    /// assert!(ListName::new("Grocery").is_ok());
    /// assert!(ListName::new("").is_err());
    /// assert!(ListName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_name("name", s).map(Self)
    }

    /// Get the list name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
