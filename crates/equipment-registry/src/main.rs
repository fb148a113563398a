//! Equipment Registry Service
//!
//! REST API for registering equipment and transferring ownership

use anyhow::{Context, Result};
use axum::http::HeaderName;
use equipment_registry::{
    create_router, AppState, Config, MemoryStore, MonotonicClock, Registry, Storage, SystemClock,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equipment_registry=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Equipment Registry Service");

    // Configuration
    let config = Config::from_env()?;
    info!("Listening on {}", config.address());
    info!("Caller header: {}", config.caller_header);

    // Restore mirrored state, if any
    let (store, storage) = match &config.redis_url {
        Some(redis_url) => {
            info!("Redis URL: {}", redis_url);
            let mut storage = Storage::new(redis_url)
                .await
                .context("Failed to initialize storage")?;
            let store = storage.load().await.context("Failed to restore registry")?;
            (store, Some(storage))
        }
        None => {
            info!("REDIS_URL not set, keeping registry in memory only");
            (MemoryStore::new(), None)
        }
    };

    // Timestamps must not fall behind anything already registered
    let floor = store.records().map(|r| r.registered_at).max().unwrap_or(0);
    let clock = Arc::new(MonotonicClock::starting_at(SystemClock, floor));

    let caller_header = HeaderName::from_bytes(config.caller_header.as_bytes())
        .context("Invalid caller header name")?;

    // Create application state
    let mut state = AppState::new(Registry::new(store), clock, caller_header);
    if let Some(storage) = storage {
        state = state.with_mirror(storage);
    }

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Equipment Registry Service running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
