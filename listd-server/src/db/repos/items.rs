//! Item repository
//!
//! Items are always addressed through their list: every statement is scoped
//! by `list_id`, and a missing list is reported as `NotFound`, never as a
//! constraint error.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use super::{is_foreign_key_violation, DbError, ItemFilter};
use crate::models::{ItemName, Quantity};

const INSERT: &str = r#"
    INSERT INTO item (list_id, name, quantity, created, modified)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING item_id, list_id, name, quantity, created, modified
"#;

const UPDATE: &str = r#"
    UPDATE item SET name = $1, quantity = $2, modified = $3
    WHERE item_id = $4 AND list_id = $5
    RETURNING item_id, list_id, name, quantity, created, modified
"#;

const DELETE: &str = "DELETE FROM item WHERE item_id = $1 AND list_id = $2";

/// Item record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    #[sqlx(rename = "item_id")]
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub quantity: i32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Mutable fields of an item
#[derive(Debug, Clone)]
pub struct ItemFields {
    pub name: ItemName,
    pub quantity: Quantity,
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a multi-row filter. Returns an empty vec when nothing matches.
    pub async fn select(&self, filter: ItemFilter) -> Result<Vec<Item>, DbError> {
        Ok(filter.query().fetch_all(self.pool).await?)
    }

    /// Run a single-row filter.
    pub async fn select_one(&self, filter: ItemFilter) -> Result<Option<Item>, DbError> {
        Ok(filter.query().fetch_optional(self.pool).await?)
    }

    /// Items of a list.
    ///
    /// An existing list without items yields an empty vec; a missing list
    /// is `NotFound`.
    pub async fn list_for_list(&self, list_id: i32) -> Result<Vec<Item>, DbError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM list WHERE list_id = $1)")
                .bind(list_id)
                .fetch_one(self.pool)
                .await?;

        if !exists.0 {
            return Err(DbError::not_found("list", list_id));
        }

        self.select(ItemFilter::ByList(list_id)).await
    }

    /// Get one item of a list.
    pub async fn get(&self, item_id: i32, list_id: i32) -> Result<Item, DbError> {
        self.select_one(ItemFilter::ByIdAndList { item_id, list_id })
            .await?
            .ok_or_else(|| DbError::not_found("item", item_id))
    }

    /// Create an item in an existing list.
    ///
    /// The list row is share-locked for the duration of the insert, so a
    /// concurrent list delete waits for us (or we see it gone).
    pub async fn create(&self, list_id: i32, fields: ItemFields) -> Result<Item, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_list(&mut tx, list_id).await?;

        let now = Utc::now();
        let item = sqlx::query_as::<_, Item>(INSERT)
            .bind(list_id)
            .bind(fields.name.as_str())
            .bind(fields.quantity.get())
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| missing_list(e, list_id))?;

        tx.commit().await?;
        Ok(item)
    }

    /// Replace an item's name and quantity and bump `modified`.
    pub async fn update(
        &self,
        item_id: i32,
        list_id: i32,
        fields: ItemFields,
    ) -> Result<Item, DbError> {
        sqlx::query_as::<_, Item>(UPDATE)
            .bind(fields.name.as_str())
            .bind(fields.quantity.get())
            .bind(Utc::now())
            .bind(item_id)
            .bind(list_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("item", item_id))
    }

    /// Delete one item of a list.
    pub async fn delete(&self, item_id: i32, list_id: i32) -> Result<(), DbError> {
        let result = sqlx::query(DELETE)
            .bind(item_id)
            .bind(list_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("item", item_id));
        }

        Ok(())
    }
}

async fn lock_list(tx: &mut Transaction<'_, Postgres>, list_id: i32) -> Result<(), DbError> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT list_id FROM list WHERE list_id = $1 FOR SHARE")
            .bind(list_id)
            .fetch_optional(&mut **tx)
            .await?;

    match row {
        Some(_) => Ok(()),
        None => Err(DbError::not_found("list", list_id)),
    }
}

fn missing_list(err: sqlx::Error, list_id: i32) -> DbError {
    if is_foreign_key_violation(&err) {
        DbError::not_found("list", list_id)
    } else {
        DbError::Sqlx(err)
    }
}
