//! API error type with IntoResponse
//!
//! Errors are converted to envelope responses with appropriate status codes.
//! Storage failures are logged with their cause and reported generically.

use std::error::Error as _;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::timeout::TimeoutError;

use super::envelope::Envelope;
use crate::db::repos::DbError;
use crate::models::ValidationError;

/// Message sent to clients for every 5xx
const INTERNAL_MESSAGE: &str = "internal server error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field or path validation failed (400)
    Validation(ValidationError),

    /// Request body could not be decoded (400)
    BadRequest { message: String },

    /// Unique constraint violated (400)
    Conflict { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// No route for this path (404)
    NoRoute,

    /// Route exists, method does not (405)
    MethodNotAllowed,

    /// Request body or response did not complete in time (408)
    Timeout,

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } | Self::Conflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } | Self::NoRoute => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } => message.clone(),
            Self::Conflict { message } => {
                format!("attempting to break unique name constraint: {}", message)
            }
            Self::NotFound { resource, id } => {
                tracing::debug!(resource = *resource, id = %id, "resource not found");
                "Not Found".to_string()
            }
            Self::NoRoute => "Not Found".to_string(),
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::Timeout => "Request Timeout".to_string(),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "database error while serving request");
                INTERNAL_MESSAGE.to_string()
            }
        };

        if status.is_client_error() {
            tracing::info!(status = status.as_u16(), message = %message, "request rejected");
        }

        (status, Json(Envelope::error(message))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                message: format!("{resource} with {field} '{value}' already exists"),
            },
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if is_body_timeout(&rejection) {
            return Self::Timeout;
        }

        Self::BadRequest {
            message: format!("unmarshal request payload: {}", rejection.body_text()),
        }
    }
}

/// True when buffering the body failed because the read timeout fired.
fn is_body_timeout(rejection: &JsonRejection) -> bool {
    let mut source = rejection.source();
    while let Some(err) = source {
        if err.is::<TimeoutError>() {
            return true;
        }
        source = err.source();
    }
    false
}
