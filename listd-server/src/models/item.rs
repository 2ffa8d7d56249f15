//! Item name and quantity validation

use super::validation::{validate_name, ValidationError};

/// Smallest accepted quantity
pub const MIN_QUANTITY: i32 = 1;

/// Validated item name (non-blank, at most 255 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_name("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated item quantity, always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    /// Validate a quantity from a request body.
    ///
    /// A missing quantity counts as zero and is rejected. Values beyond the
    /// `INT` column are rejected as malformed.
    ///
    /// # Example
    /// ```
    /// use listd_server::models::Quantity;
    ///
    /// assert!(Quantity::new(2).is_ok());
    /// assert!(Quantity::new(0).is_err());
    /// assert!(Quantity::new(-3).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < i64::from(MIN_QUANTITY) {
            return Err(ValidationError::BelowMinimum {
                field: "quantity",
                min: i64::from(MIN_QUANTITY),
            });
        }

        let value = i32::try_from(value).map_err(|_| ValidationError::InvalidFormat {
            field: "quantity",
            reason: "must fit in a 32-bit integer",
        })?;

        Ok(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}
