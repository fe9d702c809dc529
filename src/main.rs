//! FinTech API server
//!
//! Opens the store, ensures the schema, and serves the HTTP API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use fintech_api::{build_router, telemetry, AppState, Config, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Tracing first so store errors below are logged
    let hooks = telemetry::init_tracing(&config.telemetry);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting FinTech API server");

    // An unreachable store is fatal: no traffic is served without one
    let store = Store::connect(&config.store).await.map_err(|e| {
        tracing::error!(error = %e, "Store unavailable");
        e
    })?;

    tracing::info!(backend = %store.backend(), hasher = %config.password_hasher, "Store ready");

    let state = AppState::new(store.clone())
        .with_hasher(config.password_hasher)
        .with_telemetry(hooks);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutting down...");
    store.close().await;
    telemetry::shutdown();
    tracing::info!("Store connections closed. Goodbye!");

    Ok(())
}

/// Resolves on the first shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
