//! Short code resolution service.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Codes longer than this are rejected without a store lookup.
pub const MAX_LOOKUP_CODE_LENGTH: usize = 64;

/// Translates short codes back to destinations and counts visits.
pub struct Resolver<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
}

impl<L: LinkRepository + ?Sized> Resolver<L> {
    /// Creates a new resolver.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Resolves a short code to its destination and records a visit.
    ///
    /// # Request Flow
    ///
    /// 1. Check the destination cache
    /// 2. On a miss, load the link from the store and fill the cache in the background
    /// 3. Increment the visit count (best-effort)
    /// 4. Return the destination
    ///
    /// A failed increment is logged and does not fail the resolution. Cache errors fall
    /// back to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownCode`] if no link matches the code.
    /// Returns [`AppError::LinkExpired`] if the link has expired; no visit is counted.
    /// Returns [`AppError::Storage`] if the lookup itself fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if code.is_empty() || code.len() > MAX_LOOKUP_CODE_LENGTH {
            return Err(AppError::unknown_code(code));
        }

        let destination = match self.cache.get_destination(code).await {
            Ok(Some(destination)) => {
                debug!(code, "Cache HIT");
                destination
            }
            Ok(None) => {
                debug!(code, "Cache MISS");
                let link = self.lookup(code).await?;
                self.fill_cache(&link);
                link.destination
            }
            Err(e) => {
                warn!(code, error = %e, "Cache error, falling back to store");
                self.lookup(code).await?.destination
            }
        };

        self.record_visit(code).await;

        Ok(destination)
    }

    async fn lookup(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find(code)
            .await?
            .ok_or_else(|| AppError::unknown_code(code))?;

        if link.is_expired() {
            return Err(AppError::LinkExpired {
                code: code.to_string(),
            });
        }

        Ok(link)
    }

    /// Caches the destination without delaying the response.
    ///
    /// Entries for expiring links live no longer than the link itself; the cache
    /// caps every entry at its configured TTL.
    fn fill_cache(&self, link: &Link) {
        let cache = self.cache.clone();
        let code = link.code.clone();
        let destination = link.destination.clone();
        let ttl = link.remaining_ttl();

        tokio::spawn(async move {
            if let Err(e) = cache.set_destination(&code, &destination, ttl).await {
                warn!(code = %code, error = %e, "Failed to cache destination");
            }
        });
    }

    async fn record_visit(&self, code: &str) {
        match self.link_repository.increment_visit(code).await {
            Ok(()) => debug!(code, "Visit recorded"),
            Err(e) => warn!(code, error = %e, "Failed to record visit"),
        }
    }
}
