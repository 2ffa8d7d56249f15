//! Database layer - connection bootstrap, schema and repositories
//!
//! # Design Principles
//!
//! - One `PgPool` shared by every request, no application-level locks
//! - Rely on DB constraints for uniqueness, map violations to typed errors
//! - Queries come from a closed set of filters, always parameterised
//! - Transactions for multi-step operations (list delete, item create)

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{connect, DbConfig};
pub use repos::*;
