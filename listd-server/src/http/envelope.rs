//! Response envelope
//!
//! Every body the service returns (204 aside) has the shape
//! `{"results": <value|null>, "errors": [{"message": "..."}]}`.
//! Successes carry only `results`; failures carry only `errors` and a null
//! `results`. `errors` is omitted when empty.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Uniform response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub results: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorMessage>,
}

/// One client-facing error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn results(data: T) -> Self {
        Self {
            results: Some(data),
            errors: Vec::new(),
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            results: None,
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
        }
    }
}

/// Successful handler output: status plus enveloped results.
pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

pub fn reply<T>(status: StatusCode, data: T) -> Reply<T> {
    (status, Json(Envelope::results(data)))
}
