//! Shared application state injected into request handlers.

use std::sync::Arc;

use crate::application::services::{Resolver, ShortenerService, ShortenerSettings};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Services and backends shared by all handlers.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<dyn LinkRepository>>,
    pub resolver: Arc<Resolver<dyn LinkRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires the services on top of one link store and one cache.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        cache: Arc<dyn CacheService>,
        settings: ShortenerSettings,
    ) -> Self {
        let shortener = Arc::new(ShortenerService::new(
            link_repository.clone(),
            generator,
            settings,
        ));
        let resolver = Arc::new(Resolver::new(link_repository.clone(), cache.clone()));

        Self {
            shortener,
            resolver,
            link_repository,
            cache,
        }
    }
}
