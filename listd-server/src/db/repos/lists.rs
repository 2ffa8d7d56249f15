//! List repository
//!
//! - create/update: rely on the UNIQUE(name) constraint, map violations to `Conflict`
//! - delete: removes the list's items and the list in one transaction

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{is_unique_violation, DbError, ListFilter};
use crate::models::ListName;

const INSERT: &str = r#"
    INSERT INTO list (name, created, modified)
    VALUES ($1, $2, $3)
    RETURNING list_id, name, created, modified
"#;

const UPDATE: &str = r#"
    UPDATE list SET name = $1, modified = $2
    WHERE list_id = $3
    RETURNING list_id, name, created, modified
"#;

/// List record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct List {
    #[sqlx(rename = "list_id")]
    pub id: i32,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// List repository
pub struct ListRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ListRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a multi-row filter. Returns an empty vec when nothing matches.
    pub async fn select(&self, filter: ListFilter) -> Result<Vec<List>, DbError> {
        Ok(filter.query().fetch_all(self.pool).await?)
    }

    /// Run a single-row filter.
    pub async fn select_one(&self, filter: ListFilter) -> Result<Option<List>, DbError> {
        Ok(filter.query().fetch_optional(self.pool).await?)
    }

    /// All lists.
    pub async fn list_all(&self) -> Result<Vec<List>, DbError> {
        self.select(ListFilter::All).await
    }

    /// Get a single list by id.
    pub async fn get(&self, id: i32) -> Result<List, DbError> {
        self.select_one(ListFilter::ById(id))
            .await?
            .ok_or_else(|| DbError::not_found("list", id))
    }

    /// Create a list; `created` and `modified` are set to now.
    pub async fn create(&self, name: ListName) -> Result<List, DbError> {
        let now = Utc::now();

        sqlx::query_as::<_, List>(INSERT)
            .bind(name.as_str())
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await
            .map_err(|e| name_conflict(e, &name))
    }

    /// Rename a list and bump `modified`.
    pub async fn update(&self, id: i32, name: ListName) -> Result<List, DbError> {
        sqlx::query_as::<_, List>(UPDATE)
            .bind(name.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| name_conflict(e, &name))?
            .ok_or_else(|| DbError::not_found("list", id))
    }

    /// Delete a list and every item referencing it (atomic).
    ///
    /// The list row is locked first so a concurrent item insert cannot
    /// land between the two deletes.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(i32,)> =
            sqlx::query_as("SELECT list_id FROM list WHERE list_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(DbError::not_found("list", id));
        }

        let items = sqlx::query("DELETE FROM item WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM list WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(list_id = id, items_deleted = items.rows_affected(), "deleted list");
        Ok(())
    }
}

fn name_conflict(err: sqlx::Error, name: &ListName) -> DbError {
    if is_unique_violation(&err) {
        DbError::Conflict {
            resource: "list",
            field: "name",
            value: name.as_str().to_owned(),
        }
    } else {
        DbError::Sqlx(err)
    }
}
