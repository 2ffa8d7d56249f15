//! Domain values with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod item;
pub mod list;
pub mod validation;

pub use item::{ItemName, Quantity};
pub use list::ListName;
pub use validation::ValidationError;
