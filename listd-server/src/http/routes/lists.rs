//! List endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{List, ListRepo};
use crate::http::envelope::{reply, Reply};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ListId};
use crate::http::server::AppState;
use crate::models::ListName;

/// Create/update list request
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub name: String,
}

/// List response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub id: i32,
    pub name: String,
    pub created: String,
    pub modified: String,
}

impl From<List> for ListResponse {
    fn from(l: List) -> Self {
        Self {
            id: l.id,
            name: l.name,
            created: l.created.to_rfc3339(),
            modified: l.modified.to_rfc3339(),
        }
    }
}

/// GET /list - all lists, `[]` when there are none
async fn list_lists(
    State(state): State<Arc<AppState>>,
) -> Result<Reply<Vec<ListResponse>>, ApiError> {
    let lists = ListRepo::new(&state.pool).list_all().await?;

    Ok(reply(
        StatusCode::OK,
        lists.into_iter().map(ListResponse::from).collect(),
    ))
}

/// POST /list - create a list
async fn create_list(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ListRequest>,
) -> Result<Reply<ListResponse>, ApiError> {
    let name = ListName::new(&req.name)?;
    let list = ListRepo::new(&state.pool).create(name).await?;

    tracing::info!(list_id = list.id, "created list");
    Ok(reply(StatusCode::CREATED, ListResponse::from(list)))
}

/// GET /list/{lid} - get a single list
async fn get_list(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
) -> Result<Reply<ListResponse>, ApiError> {
    let list = ListRepo::new(&state.pool).get(id).await?;
    Ok(reply(StatusCode::OK, ListResponse::from(list)))
}

/// PUT /list/{lid} - rename a list
async fn update_list(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
    JsonBody(req): JsonBody<ListRequest>,
) -> Result<Reply<ListResponse>, ApiError> {
    let name = ListName::new(&req.name)?;
    let list = ListRepo::new(&state.pool).update(id, name).await?;
    Ok(reply(StatusCode::OK, ListResponse::from(list)))
}

/// DELETE /list/{lid} - delete a list and its items
async fn delete_list(
    State(state): State<Arc<AppState>>,
    ListId(id): ListId,
) -> Result<StatusCode, ApiError> {
    ListRepo::new(&state.pool).delete(id).await?;

    tracing::info!(list_id = id, "deleted list");
    Ok(StatusCode::NO_CONTENT)
}

/// List routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(list_lists).post(create_list))
        .route(
            "/list/{lid}",
            get(get_list).put(update_list).delete(delete_list),
        )
}
