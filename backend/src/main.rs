//! Payments server entry-point: loads settings, prepares the database and
//! serves the REST API.

mod server;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use payments::outbound::persistence::{DbPool, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let database_url = settings.database_url()?;

    if settings.run_migrations() {
        run_migrations(database_url)
            .await
            .wrap_err("database migration failed")?;
    }

    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("failed to create database pool")?;
    let config = ServerConfig::new(bind_addr, pool)
        .with_docs(settings.docs_enabled())
        .with_shutdown_timeout(settings.shutdown_timeout_secs());

    let server = create_server(config).wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, docs = settings.docs_enabled(), "payments server listening");
    server.await.wrap_err("server terminated with an error")?;
    info!("payments server stopped");
    Ok(())
}
