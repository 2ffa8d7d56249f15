//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Reads go through a closed filter enum (no ad hoc predicates)
//! - Constraint violations come back as typed `DbError` variants
//! - Multi-step writes run inside one transaction

pub mod filters;
pub mod items;
pub mod lists;

pub use filters::{ItemFilter, ListFilter};
pub use items::{Item, ItemFields, ItemRepo};
pub use lists::{List, ListRepo};

/// Database error type
///
/// Handlers branch on the variant; only `Sqlx` carries an unexpected cause.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} with {field} '{value}' already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// True when the error is a PostgreSQL unique violation (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// True when the error is a PostgreSQL foreign key violation (SQLSTATE 23503).
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("list", 42);
        assert_eq!(err.to_string(), "not found: list '42'");
    }

    #[test]
    fn conflict_display() {
        let err = DbError::Conflict {
            resource: "list",
            field: "name",
            value: "Grocery".into(),
        };
        assert_eq!(
            err.to_string(),
            "conflict: list with name 'Grocery' already exists"
        );
    }

    #[test]
    fn plain_sqlx_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }
}
