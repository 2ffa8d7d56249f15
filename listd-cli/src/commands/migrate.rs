//! Schema command: bootstrap the database and exit

use anyhow::{Context, Result};
use clap::Parser;

use listd_server::db::connect;

use crate::config::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = connect(&args.db.to_db_config())
        .await
        .context("Failed to apply database schema")?;

    tracing::info!(db = %args.db.db_name, "schema is up to date");
    pool.close().await;
    Ok(())
}
