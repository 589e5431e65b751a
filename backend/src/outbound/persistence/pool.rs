//! bb8 pool of `AsyncPgConnection`s backing payment transactions.
//!
//! Each transaction owns one checked-out connection until it commits or
//! rolls back, so `max_size` caps concurrent units of work and the
//! connection timeout caps how long a request waits to begin one.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection, RunError};

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The sizing settings cannot describe a working pool.
    #[error("invalid pool settings: {message}")]
    Config { message: String },

    /// The pool could not be created against the database.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// No connection became free before the timeout.
    #[error("no database connection available after {waited:?}")]
    Exhausted { waited: Duration },

    /// Opening a fresh connection failed.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
}

/// Sizing and timeout settings for [`DbPool`].
///
/// ```
/// use std::time::Duration;
/// use payments::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/payments")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "postgres://localhost/payments");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Settings for `database_url`: 10 connections, 2 idle, 30 s checkout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(DEFAULT_MIN_IDLE),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Reject sizes bb8 would refuse at build time.
    fn validate(&self) -> Result<(), PoolError> {
        if self.max_size == 0 {
            return Err(PoolError::Config {
                message: "max_size must be at least 1".to_owned(),
            });
        }
        match self.min_idle {
            Some(min_idle) if min_idle > self.max_size => Err(PoolError::Config {
                message: format!(
                    "min_idle {min_idle} exceeds max_size {}",
                    self.max_size
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// Shared pool of PostgreSQL connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
    connection_timeout: Duration,
}

impl DbPool {
    /// Build the pool, opening `min_idle` connections up front.
    ///
    /// # Errors
    /// [`PoolError::Config`] for impossible sizing and [`PoolError::Build`]
    /// when the initial connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build {
                message: err.to_string(),
            })?;

        Ok(Self {
            inner,
            connection_timeout: config.connection_timeout,
        })
    }

    /// Check out a connection that a transaction handle can own.
    ///
    /// # Errors
    /// [`PoolError::Exhausted`] when the timeout elapses and
    /// [`PoolError::Checkout`] when a new connection fails to open.
    pub async fn get_owned(
        &self,
    ) -> Result<PooledConnection<'static, AsyncPgConnection>, PoolError> {
        self.inner
            .get_owned()
            .await
            .map_err(|err| checkout_error(err, self.connection_timeout))
    }
}

fn checkout_error(err: RunError, waited: Duration) -> PoolError {
    match err {
        RunError::TimedOut => PoolError::Exhausted { waited },
        RunError::User(inner) => PoolError::Checkout {
            message: inner.to_string(),
        },
    }
}
