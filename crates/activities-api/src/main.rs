//! Activities API - Entry point.

use activities_api::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    bootstrap,
    config::Config,
    logging::init_logging,
};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    init_logging(&config.log);

    info!("Starting Mergington activities API");

    let store = bootstrap::open_store(&config.store).await?;

    let state = AppState::new(store, config.static_files.dir.clone());
    let store = Arc::clone(&state.store);

    let rate_limit = RateLimitState::from_config(&config.rate_limit);
    if let Some(per_minute) = config.rate_limit.per_client_per_minute {
        info!("Registration calls limited to {} per client per minute", per_minute);
    }
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
