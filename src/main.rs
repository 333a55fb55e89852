//! User Cache - a user-record HTTP service over a key-value cache
//!
//! Every controller and service call is logged through an interceptor that
//! redacts sensitive values and keeps its context task-local.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_cache::cache::{CacheBackend, InMemoryBackend, RedisBackend};
use user_cache::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the user cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the cache backend (Redis when `CACHE_URL` is set)
/// 4. Start background TTL cleanup task for the in-process cache
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting User Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, map={}, ttl={}s, cache={}, sensitive_keys={:?}",
        config.server_port,
        config.cache_map_name,
        config.cache_ttl,
        if config.cache_url.is_some() { "redis" } else { "in-memory" },
        config.sensitive_keys.enabled().collect::<Vec<_>>()
    );

    let (backend, cleanup_handle) = init_cache(&config).await?;
    info!("Cache backend initialized: {}", backend.name());

    let state = AppState::new(backend, &config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Connect info feeds the client IP into call logs
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured cache backend.
///
/// The in-process backend comes with its cleanup task; Redis expires keys
/// on its own.
async fn init_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheBackend>, Option<JoinHandle<()>>)> {
    match &config.cache_url {
        Some(url) => {
            let backend = RedisBackend::connect(url)
                .await
                .context("failed to connect to Redis")?;
            Ok((Arc::new(backend), None))
        }
        None => {
            let backend = InMemoryBackend::new();
            let handle = spawn_cleanup_task(
                backend.store(),
                Duration::from_secs(config.cleanup_interval.max(1)),
            );
            info!("Background cleanup task started");
            Ok((Arc::new(backend), Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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
        warn!("Cleanup task aborted");
    }
}
