//! Database connection bootstrap
//!
//! The service is usually started next to its database (docker compose,
//! k8s pod), so the first connection attempts are expected to fail. We keep
//! retrying at a fixed interval until both the connection and a liveness
//! query succeed, then apply the schema.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use super::schema;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default delay between connection attempts.
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Connection settings for the PostgreSQL backend.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub pass: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Fixed delay between failed connection attempts
    pub retry_interval: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            pass: "root".to_string(),
            name: "list".to_string(),
            host: "db".to_string(),
            port: 5432,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl DbConfig {
    /// Build sqlx connect options. SSL is off: the database lives on the
    /// same private network as the service.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.pass)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

/// Connect to the database, waiting until it is reachable, and apply the
/// schema.
///
/// Retries forever; only a schema failure is returned as an error.
///
/// # Example
///
/// ```ignore
/// let pool = connect(&DbConfig::default()).await?;
/// ```
pub async fn connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = wait_for_database(config).await;
    schema::apply(&pool).await?;
    Ok(pool)
}

/// Retry connecting until a pool is established and answers `SELECT 1`.
pub async fn wait_for_database(config: &DbConfig) -> PgPool {
    tracing::info!(host = %config.host, port = config.port, db = %config.name, "verifying postgres connection");

    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match try_connect(config).await {
            Ok(pool) => {
                tracing::info!(attempt, "connected to postgres database");
                return pool;
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    error = %e,
                    retry_in_ms = config.retry_interval.as_millis() as u64,
                    "postgres not ready"
                );
                tokio::time::sleep(config.retry_interval).await;
            }
        }
    }
}

async fn try_connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;

    ping(&pool).await?;
    Ok(pool)
}

/// Create a pool from a connection URL without retrying.
///
/// Used by tooling and integration tests that already know the database is up.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Trivial liveness query.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
