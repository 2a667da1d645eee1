//! Redis Sessions demo server
//!
//! Serves a small session API backed by Redis, or by the in-process cache
//! when `CACHE_BACKEND=memory`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_sessions::api::create_router;
use redis_sessions::config::CacheBackend;
use redis_sessions::{spawn_cleanup_task, AppState, Config, MemoryCache, SessionStore};

/// Main entry point for the demo server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the session store (fails fast if the cache does not answer PING)
/// 4. Start the expiry sweep for the memory backend
/// 5. Serve until SIGINT/SIGTERM, then close the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_sessions=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Redis Sessions demo server");

    let config = Config::from_env();
    info!(
        backend = ?config.cache_backend,
        address = %config.redis_address,
        db = config.redis_db,
        session_name = %config.session_name,
        port = config.server_port,
        "Configuration loaded"
    );
    if config.uses_dev_key() {
        warn!("SESSION_KEYS not set, signing cookies with the development key");
    }

    let (store, cleanup_handle) = match config.cache_backend {
        CacheBackend::Redis => {
            let store = SessionStore::connect_with_db(
                config.redis_pool_size,
                &config.redis_network,
                &config.redis_address,
                &config.redis_password,
                config.redis_db,
                &config.session_keys,
            )
            .await
            .context("Failed to connect session store to Redis")?;
            (store, None)
        }
        CacheBackend::Memory => {
            let cache = MemoryCache::new();
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            let store = SessionStore::with_client(Arc::new(cache), &config.session_keys)
                .await
                .context("Failed to create in-memory session store")?;
            (store, Some(handle))
        }
    };
    info!("Session store ready");

    let state = AppState::new(store, config.session_name.clone());
    let store = state.store.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    store.close().await.context("Failed to close session store")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the expiry sweep.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
