use std::sync::Arc;

use anyhow::Context;
use config::{Config, LogFormat};
use database::Database;
use library::SongLibrary;
use lookup::LookupClient;
use tokio::net::TcpListener;
use tracing::{info, instrument};

mod config;
mod error;
mod handlers;
mod library;
mod routes;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();

    {
        use tracing_subscriber::prelude::*;

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);
        match config.log_format {
            LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
        }
    }

    let library = build_library(&config).await?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "server started");

    axum::serve(listener, routes::router(Arc::new(library)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

#[instrument(skip_all)]
async fn build_library(config: &Config) -> anyhow::Result<SongLibrary> {
    let database = Database::connect(&config.database_url, &config.pool_settings())
        .await
        .context("failed to connect to database")?;
    database
        .migrate()
        .await
        .context("failed to create songs table")?;

    let lookup = LookupClient::new(&config.external_api_url, config.lookup_timeout())
        .context("failed to build song info client")?;

    Ok(SongLibrary::new(Arc::new(database), Arc::new(lookup)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
