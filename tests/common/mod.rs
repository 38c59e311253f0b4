#![allow(dead_code)]

use std::sync::Arc;
use suri::application::services::ShortenerSettings;
use suri::domain::entities::NewLink;
use suri::domain::repositories::LinkRepository;
use suri::infrastructure::cache::{CacheService, NullCache};
use suri::infrastructure::persistence::MemoryLinkRepository;
use suri::state::AppState;
use suri::utils::code_generator::CodeSettings;
use url::Url;

pub const BASE_URL: &str = "https://s.example.com/";

pub fn test_settings() -> ShortenerSettings {
    ShortenerSettings::new(Url::parse(BASE_URL).unwrap())
}

/// Memory-backed state with caching disabled.
pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    create_test_state_with(test_settings(), Arc::new(NullCache::new()))
}

pub fn create_test_state_with(
    settings: ShortenerSettings,
    cache: Arc<dyn CacheService>,
) -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let generator = CodeSettings::default().build_generator(0);
    let state = AppState::new(repo.clone(), Arc::from(generator), cache, settings);
    (state, repo)
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, destination: &str) {
    repo.insert(NewLink {
        code: code.to_string(),
        destination: destination.to_string(),
        expires_at: None,
    })
    .await
    .unwrap();
}

pub async fn create_expired_link(repo: &MemoryLinkRepository, code: &str, destination: &str) {
    repo.insert(NewLink {
        code: code.to_string(),
        destination: destination.to_string(),
        expires_at: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
    })
    .await
    .unwrap();
}
