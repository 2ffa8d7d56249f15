//! HTTP server layer
//!
//! Axum server with:
//! - Uniform `{results, errors}` envelope on every response body
//! - Per-request correlation id and completion log
//! - Read/write timeouts
//! - Graceful shutdown bounded by a timeout

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use envelope::{Envelope, ErrorMessage};
pub use error::ApiError;
pub use server::{build_router, run_server, serve_until_shutdown, AppState, ServerConfig, ServerError};
