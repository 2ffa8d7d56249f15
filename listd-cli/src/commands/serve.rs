//! HTTP server command
//!
//! Waits for the database, applies the schema and serves until shutdown.

use anyhow::{Context, Result};
use clap::Parser;

use listd_server::db::connect;
use listd_server::http::run_server;

use crate::config::{DatabaseArgs, HttpArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub http: HttpArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let server_config = args.http.to_server_config();
    tracing::info!(addr = %server_config.bind_addr, "starting listd");

    // Blocks until the database answers
    let pool = connect(&args.db.to_db_config())
        .await
        .context("Failed to apply database schema")?;

    // Run server (blocks until shutdown)
    run_server(pool.clone(), server_config)
        .await
        .context("Server error")?;

    pool.close().await;
    Ok(())
}
