//! Server settings loaded via OrthoConfig.
//!
//! Every field can be set with a `PAYMENTS_`-prefixed environment variable,
//! a command-line flag or a configuration file.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use payments::outbound::persistence::PoolConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RUN_MIGRATIONS: bool = false;
const DEFAULT_DOCS: bool = true;

/// Problems found while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("PAYMENTS_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address does not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Configuration values for the payments server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAYMENTS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Apply pending migrations before serving.
    pub run_migrations: Option<bool>,
    /// Serve Swagger UI and the OpenAPI document.
    pub docs: Option<bool>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Seconds in-flight requests get to finish on shutdown.
    pub shutdown_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Return the listen address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// Return the database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Build the connection pool configuration.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
            .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)))
            .with_connection_timeout(Duration::from_secs(
                self.pool_connection_timeout_secs
                    .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
            )))
    }

    /// Whether pending migrations run at start-up; off unless requested.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    /// Whether Swagger UI and the OpenAPI document are served; on by default.
    pub fn docs_enabled(&self) -> bool {
        self.docs.unwrap_or(DEFAULT_DOCS)
    }

    /// Return the graceful shutdown timeout in seconds.
    pub fn shutdown_timeout_secs(&self) -> u64 {
        self.shutdown_timeout_secs
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS)
    }
}
