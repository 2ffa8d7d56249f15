//! Liveness/readiness probes
//!
//! Both answer 200 only when the database responds to a trivial query.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::db::{pool::ping, DbError};
use crate::http::envelope::{reply, Reply};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /ready, GET /healthy
async fn probe(State(state): State<Arc<AppState>>) -> Result<Reply<HealthResponse>, ApiError> {
    ping(&state.pool).await.map_err(DbError::from)?;

    Ok(reply(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    ))
}

/// Probe routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ready", get(probe))
        .route("/healthy", get(probe))
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::{empty_request, first_error, offline_app, send};

    #[tokio::test]
    async fn probes_fail_when_database_is_unreachable() {
        for path in ["/ready", "/healthy"] {
            let (status, _, body) = send(offline_app(), empty_request("GET", path)).await;
            assert_eq!(status.as_u16(), 500, "{path}");
            assert_eq!(first_error(&body), "internal server error");
        }
    }
}
