//! Scraper Gateway - caching, rate-limited front for a scraping backend
//!
//! # Startup Sequence
//! 1. Load `.env` and initialize tracing
//! 2. Load configuration; a missing backend credential aborts startup
//! 3. Build shared state (cache, limiter, backend client)
//! 4. Start the background expiry sweep if enabled
//! 5. Serve HTTP until SIGINT/SIGTERM

use std::net::SocketAddr;

use anyhow::Context;
use tokio::{signal, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scraper_gateway::{create_router, spawn_cleanup_task, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scraper_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scraper Gateway");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: cache_max_entries={}, cache_ttl={}s, rate_limit={}/{}s, port={}, cleanup_interval={}s",
        config.cache_max_entries,
        config.cache_ttl,
        config.rate_limit_max,
        config.rate_limit_window,
        config.server_port,
        config.cleanup_interval
    );

    let state = AppState::from_config(&config).context("Failed to initialize gateway state")?;
    info!("Cache store and backend client initialized");

    let cleanup_handle = config.cleanup_interval().map(|interval| {
        let handle = spawn_cleanup_task(state.cache.clone(), state.limiter.clone(), interval);
        info!("Background expiry sweep started");
        handle
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }
}
