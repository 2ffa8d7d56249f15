//! Custom Axum extractors
//!
//! Rejections are `ApiError`s, so malformed input always gets an envelope
//! body instead of axum's plain-text rejection.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// `{lid}` path segment parsed as an integer
pub struct ListId(pub i32);

impl<S> FromRequestParts<S> for ListId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "lid", "list id").await.map(Self)
    }
}

/// `{iid}` path segment parsed as an integer
pub struct ItemId(pub i32);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "iid", "item id").await.map(Self)
    }
}

async fn path_id<S>(
    parts: &mut Parts,
    state: &S,
    key: &str,
    field: &'static str,
) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let Path(params): Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::Validation(ValidationError::Empty { field }))?;

    let raw = params
        .get(key)
        .ok_or(ApiError::Validation(ValidationError::Empty { field }))?;

    raw.parse::<i32>().map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field,
            reason: "must be an integer",
        })
    })
}

/// JSON request body with envelope-shaped rejections
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
