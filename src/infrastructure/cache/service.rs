//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of short code to destination URL.
///
/// Destinations never change after creation, so entries need no invalidation.
/// Implementations must be thread-safe; cache failures degrade to store lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the destination for a short code.
    ///
    /// Returns `Ok(None)` on a miss.
    async fn get_destination(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a destination with an optional TTL in seconds.
    ///
    /// `None` applies the implementation default; a longer TTL is capped at it.
    async fn set_destination(
        &self,
        code: &str,
        destination: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reports.
    fn name(&self) -> &'static str;
}
