//! Item endpoints, nested under their list

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Item, ItemFields, ItemRepo};
use crate::http::envelope::{reply, Reply};
use crate::http::error::ApiError;
use crate::http::extractors::{ItemId, JsonBody, ListId};
use crate::http::server::AppState;
use crate::models::{ItemName, Quantity, ValidationError};

/// Create/update item request
///
/// Missing fields default to empty/zero and fail validation.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
}

impl ItemRequest {
    fn validate(self) -> Result<ItemFields, ValidationError> {
        Ok(ItemFields {
            name: ItemName::new(&self.name)?,
            quantity: Quantity::new(self.quantity)?,
        })
    }
}

/// Item response
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i32,
    #[serde(rename = "listID")]
    pub list_id: i32,
    pub name: String,
    pub quantity: i32,
    pub created: String,
    pub modified: String,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        Self {
            id: i.id,
            list_id: i.list_id,
            name: i.name,
            quantity: i.quantity,
            created: i.created.to_rfc3339(),
            modified: i.modified.to_rfc3339(),
        }
    }
}

/// GET /list/{lid}/item - items of a list, `[]` if it has none, 404 if the list is missing
async fn list_items(
    State(state): State<Arc<AppState>>,
    ListId(list_id): ListId,
) -> Result<Reply<Vec<ItemResponse>>, ApiError> {
    let items = ItemRepo::new(&state.pool).list_for_list(list_id).await?;

    Ok(reply(
        StatusCode::OK,
        items.into_iter().map(ItemResponse::from).collect(),
    ))
}

/// POST /list/{lid}/item - add an item to a list
async fn create_item(
    State(state): State<Arc<AppState>>,
    ListId(list_id): ListId,
    JsonBody(req): JsonBody<ItemRequest>,
) -> Result<Reply<ItemResponse>, ApiError> {
    let fields = req.validate()?;
    let item = ItemRepo::new(&state.pool).create(list_id, fields).await?;

    tracing::info!(list_id, item_id = item.id, "created item");
    Ok(reply(StatusCode::CREATED, ItemResponse::from(item)))
}

/// GET /list/{lid}/item/{iid} - get one item
async fn get_item(
    State(state): State<Arc<AppState>>,
    ListId(list_id): ListId,
    ItemId(item_id): ItemId,
) -> Result<Reply<ItemResponse>, ApiError> {
    let item = ItemRepo::new(&state.pool).get(item_id, list_id).await?;
    Ok(reply(StatusCode::OK, ItemResponse::from(item)))
}

/// PUT /list/{lid}/item/{iid} - replace name and quantity
async fn update_item(
    State(state): State<Arc<AppState>>,
    ListId(list_id): ListId,
    ItemId(item_id): ItemId,
    JsonBody(req): JsonBody<ItemRequest>,
) -> Result<Reply<ItemResponse>, ApiError> {
    let fields = req.validate()?;
    let item = ItemRepo::new(&state.pool)
        .update(item_id, list_id, fields)
        .await?;
    Ok(reply(StatusCode::OK, ItemResponse::from(item)))
}

/// DELETE /list/{lid}/item/{iid} - delete one item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ListId(list_id): ListId,
    ItemId(item_id): ItemId,
) -> Result<StatusCode, ApiError> {
    ItemRepo::new(&state.pool).delete(item_id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list/{lid}/item", get(list_items).post(create_item))
        .route(
            "/list/{lid}/item/{iid}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
