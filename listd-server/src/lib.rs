//! listd-server: HTTP service for lists and their items
//!
//! Exposes CRUD over two related tables (`list` and `item`) with a
//! uniform JSON envelope on every response.
//!
//! - `db`: connection bootstrap, schema, repositories
//! - `models`: validated input values
//! - `http`: envelope, errors, extractors, middleware, routes, server runner

pub mod db;
pub mod http;
pub mod models;

pub use db::{connect, DbConfig};
pub use http::{build_router, run_server, AppState, ServerConfig};
