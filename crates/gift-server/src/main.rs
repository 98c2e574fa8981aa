//! Gift Server
//!
//! Serves the gift catalog, gift sending and the per-user new-gift counter
//! over a JSON HTTP API. Gifts live in SQLite; the counters live in an
//! in-memory cache or Redis.

mod config;
mod handlers;
mod routes;
mod services;
mod storage;

use anyhow::{Context, Result};
use gift_core::ports::CounterCache;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{CacheBackend, ServerConfig};
use crate::services::{GiftCatalog, GiftService, GiftTallyCache, LogNotifier};
use crate::storage::{Database, MemoryCache, RedisCache};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<GiftCatalog>,
    pub gifts: Arc<GiftService>,
    pub tally: Arc<GiftTallyCache>,
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(config.log.json) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Gift Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Config loaded: bind={}, db={}, cache={:?}",
        config.bind_address, config.database_path, config.cache.backend
    );

    let db = Arc::new(
        Database::new(&config.database_path)
            .await
            .context("Failed to initialize database")?,
    );
    info!("SQLite database initialized at: {}", config.database_path);

    let cache: Arc<dyn CounterCache> = match config.cache.backend {
        CacheBackend::Memory => {
            info!("Using in-memory counter cache");
            Arc::new(MemoryCache::new())
        }
        CacheBackend::Redis => {
            let url = config
                .cache
                .redis_url
                .as_deref()
                .context("cache.redis_url is not set")?;
            info!("Connecting to Redis counter cache");
            Arc::new(
                RedisCache::connect(url)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
    };

    let tally = Arc::new(GiftTallyCache::new(
        cache,
        db.clone(),
        config.cache.key_prefix.clone(),
    ));
    let state = AppState {
        catalog: Arc::new(GiftCatalog::new(db.clone())),
        gifts: Arc::new(GiftService::new(
            db.clone(),
            db,
            tally.clone(),
            Arc::new(LogNotifier),
        )),
        tally,
    };

    let app = routes::router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
