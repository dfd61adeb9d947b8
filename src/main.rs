use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use sun_times::config::Config;
use sun_times::server::{AppState, router};
use sun_times::timezone::TzfLookup;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ephemeris = config.ephemeris();
    tracing::info!(
        search_step_minutes = config.search_step_minutes,
        delta_t = ?ephemeris.delta_t(),
        elevation = ephemeris.elevation(),
        "ephemeris ready"
    );

    let zones = TzfLookup::new();
    tracing::info!("time zone boundaries loaded");

    let app = router(AppState::new(Arc::new(ephemeris), Arc::new(zones)));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(address = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
