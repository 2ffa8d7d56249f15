//! Request middleware
//!
//! `request_context` reuses an inbound `X-Request-Id` or generates a UUID,
//! echoes it on the response, runs the handler inside a span carrying it,
//! and logs one completion line per request. `timeout_envelope` gives the
//! write timeout's bare 408 the usual envelope body.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use super::error::ApiError;

/// Correlation header, read from requests and set on responses
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn request_context(request: Request, next: Next) -> Response {
    let started = Instant::now();

    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    tracing::info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        status = response.status().as_u16(),
        "completed request"
    );

    response
}

/// Replace a body-less 408 with an `ApiError::Timeout` envelope.
///
/// Handler-produced 408s already carry a JSON body and pass through.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(CONTENT_TYPE)
    {
        return ApiError::Timeout.into_response();
    }
    response
}
