//! Runtime configuration
//!
//! Flags with environment fallbacks and defaults suited to the compose
//! setup (database reachable as `db`). Durations are whole seconds.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Args;
use listd_server::{DbConfig, ServerConfig};

/// HTTP listener settings
#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    /// Port the daemon listens on (all interfaces)
    #[arg(long, env = "LIST_DAEMON_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds allowed to receive a request body
    #[arg(long, env = "READ_TIMEOUT", default_value_t = 5)]
    pub read_timeout: u64,

    /// Seconds allowed to produce a response
    #[arg(long, env = "WRITE_TIMEOUT", default_value_t = 10)]
    pub write_timeout: u64,

    /// Seconds in-flight requests may run after a shutdown signal
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 5)]
    pub shutdown_timeout: u64,
}

impl HttpArgs {
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], self.port)),
            read_timeout: Duration::from_secs(self.read_timeout),
            write_timeout: Duration::from_secs(self.write_timeout),
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout),
        }
    }
}

/// PostgreSQL connection settings
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    #[arg(long, env = "DB_PASS", default_value = "root", hide_env_values = true)]
    pub db_pass: String,

    #[arg(long, env = "DB_NAME", default_value = "list")]
    pub db_name: String,

    #[arg(long, env = "DB_HOST", default_value = "db")]
    pub db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Seconds between connection attempts while the database is starting
    #[arg(long, env = "DB_RETRY_INTERVAL", default_value_t = 1)]
    pub db_retry_interval: u64,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,
}

impl DatabaseArgs {
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            user: self.db_user.clone(),
            pass: self.db_pass.clone(),
            name: self.db_name.clone(),
            host: self.db_host.clone(),
            port: self.db_port,
            max_connections: self.db_max_connections.max(1),
            retry_interval: Duration::from_secs(self.db_retry_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_args_map_to_server_config() {
        let args = HttpArgs {
            port: 8080,
            read_timeout: 2,
            write_timeout: 3,
            shutdown_timeout: 4,
        };
        let config = args.to_server_config();

        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.write_timeout, Duration::from_secs(3));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(4));
    }

    #[test]
    fn database_args_map_to_db_config() {
        let args = DatabaseArgs {
            db_user: "app".into(),
            db_pass: "secret".into(),
            db_name: "list".into(),
            db_host: "localhost".into(),
            db_port: 6543,
            db_retry_interval: 2,
            db_max_connections: 0,
        };
        let config = args.to_db_config();

        assert_eq!(config.user, "app");
        assert_eq!(config.port, 6543);
        assert_eq!(config.retry_interval, Duration::from_secs(2));
        // a pool needs at least one connection
        assert_eq!(config.max_connections, 1);
    }
}
