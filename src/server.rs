//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, cache setup, code generator seeding, and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Code generator, seeded from the number of stored links
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or the settings are invalid.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let link_repository = build_link_repository(config).await?;
    let cache = build_cache(config).await;

    // Sequence codes continue after the links already stored.
    let existing = link_repository.count().await?;
    let generator = config
        .code_settings()
        .build_generator(u64::try_from(existing).unwrap_or(0));
    tracing::info!(
        strategy = %config.code_strategy,
        existing,
        "Code generator ready"
    );

    Ok(AppState::new(
        link_repository,
        Arc::from(generator),
        cache,
        config.shortener_settings()?,
    ))
}

/// Selects the link store: PostgreSQL when a database is configured, memory otherwise.
///
/// # Errors
///
/// Returns an error if the database connection or migrations fail.
pub async fn build_link_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.database_url {
        Some(ref database_url) => {
            let pool = connect_database(config, database_url).await?;
            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, links are kept in memory");
            Ok(Arc::new(MemoryLinkRepository::new()))
        }
    }
}

/// Connects the pool and applies pending migrations.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
