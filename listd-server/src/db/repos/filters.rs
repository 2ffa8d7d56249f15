//! Named query shapes for reads
//!
//! Every read the repositories issue is one of these variants. Each variant
//! carries exactly the parameters its statement binds, so the set of SELECTs
//! hitting the database is fixed and reviewable.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use super::{Item, List};

/// Read shapes for the `list` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Every list, natural storage order
    All,
    /// A single list by `list_id`
    ById(i32),
}

impl ListFilter {
    /// SQL text for this filter.
    pub fn statement(&self) -> &'static str {
        match self {
            Self::All => "SELECT list_id, name, created, modified FROM list ORDER BY list_id",
            Self::ById(_) => "SELECT list_id, name, created, modified FROM list WHERE list_id = $1",
        }
    }

    /// Statement with this filter's parameters bound.
    pub(crate) fn query(&self) -> QueryAs<'static, Postgres, List, PgArguments> {
        let query = sqlx::query_as::<_, List>(self.statement());
        match *self {
            Self::All => query,
            Self::ById(id) => query.bind(id),
        }
    }
}

/// Read shapes for the `item` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFilter {
    /// Every item of one list
    ByList(i32),
    /// One item, scoped to its list
    ByIdAndList { item_id: i32, list_id: i32 },
}

impl ItemFilter {
    /// SQL text for this filter.
    pub fn statement(&self) -> &'static str {
        match self {
            Self::ByList(_) => {
                "SELECT item_id, list_id, name, quantity, created, modified \
                 FROM item WHERE list_id = $1 ORDER BY item_id"
            }
            Self::ByIdAndList { .. } => {
                "SELECT item_id, list_id, name, quantity, created, modified \
                 FROM item WHERE item_id = $1 AND list_id = $2"
            }
        }
    }

    /// Statement with this filter's parameters bound.
    pub(crate) fn query(&self) -> QueryAs<'static, Postgres, Item, PgArguments> {
        let query = sqlx::query_as::<_, Item>(self.statement());
        match *self {
            Self::ByList(list_id) => query.bind(list_id),
            Self::ByIdAndList { item_id, list_id } => query.bind(item_id).bind(list_id),
        }
    }
}
