//! HTTP server configuration object.

use std::net::SocketAddr;

use payments::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) docs: bool,
    pub(crate) shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Construct a server configuration for `bind_addr` backed by `db_pool`.
    ///
    /// Docs are enabled and shutdown waits 30 seconds unless overridden.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            docs: true,
            shutdown_timeout_secs: 30,
        }
    }

    /// Serve Swagger UI and the OpenAPI document.
    #[must_use]
    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    /// Seconds in-flight requests get to finish after a shutdown signal.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, secs: u64) -> Self {
        self.shutdown_timeout_secs = secs;
        self
    }
}
