//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis cache for destination lookups.
///
/// Uses `ConnectionManager` for automatic reconnection and connection reuse.
/// Operations are fail-open: errors are logged and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies when [`CacheService::set_destination`] is called
    /// without a TTL; controlled via `CACHE_TTL_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "suri:link:".to_string(),
        })
    }

    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

/// Entry lifetime: the requested TTL capped at the configured default.
fn effective_ttl(requested: Option<u64>, default_ttl: u64) -> u64 {
    requested.map_or(default_ttl, |ttl| ttl.min(default_ttl))
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_destination(&self, code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(hit) => {
                debug!(code, hit = hit.is_some(), "Cache lookup");
                Ok(hit)
            }
            Err(e) => {
                warn!(code, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_destination(
        &self,
        code: &str,
        destination: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = effective_ttl(ttl_seconds, self.default_ttl);
        if ttl == 0 {
            return Ok(());
        }

        let key = self.build_key(code);
        let mut conn = self.client.clone();

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, destination, ttl).await {
            warn!(code, error = %e, "Redis SET failed");
        } else {
            debug!(code, ttl, "Cache SET");
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
