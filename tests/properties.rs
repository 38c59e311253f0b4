//! End-to-end behaviour of the shortener and resolver over the in-memory store.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use suri::application::services::{Resolver, ShortenerService, ShortenerSettings};
use suri::domain::repositories::LinkRepository;
use suri::error::AppError;
use suri::infrastructure::cache::NullCache;
use suri::infrastructure::persistence::MemoryLinkRepository;
use suri::utils::code_generator::{CodeGenerator, CodeSettings, CodeStrategy};
use tokio::task::JoinSet;

fn services(
    code_settings: CodeSettings,
    settings: ShortenerSettings,
) -> (
    Arc<ShortenerService<MemoryLinkRepository>>,
    Arc<Resolver<MemoryLinkRepository>>,
    Arc<MemoryLinkRepository>,
) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let generator: Arc<dyn CodeGenerator> = Arc::from(code_settings.build_generator(0));
    let shortener = Arc::new(ShortenerService::new(repo.clone(), generator, settings));
    let resolver = Arc::new(Resolver::new(repo.clone(), Arc::new(NullCache::new())));
    (shortener, resolver, repo)
}

fn default_services() -> (
    Arc<ShortenerService<MemoryLinkRepository>>,
    Arc<Resolver<MemoryLinkRepository>>,
    Arc<MemoryLinkRepository>,
) {
    services(CodeSettings::default(), common::test_settings())
}

#[tokio::test]
async fn test_shorten_then_resolve_returns_normalized_url() {
    let (shortener, resolver, repo) = default_services();

    let link = shortener.shorten("example.com/page").await.unwrap();
    assert_eq!(link.destination, "https://example.com/page");

    let destination = resolver.resolve(&link.code).await.unwrap();
    assert_eq!(destination, "https://example.com/page");

    let stored = repo.find(&link.code).await.unwrap().unwrap();
    assert_eq!(stored.visit_count, 1);
}

#[tokio::test]
async fn test_repeated_resolve_is_stable_and_counts() {
    let (shortener, resolver, repo) = default_services();
    let link = shortener.shorten("https://example.com/a").await.unwrap();

    let mut last_count = 0;
    for _ in 0..5 {
        assert_eq!(
            resolver.resolve(&link.code).await.unwrap(),
            "https://example.com/a"
        );
        let count = repo.find(&link.code).await.unwrap().unwrap().visit_count;
        assert!(count > last_count);
        last_count = count;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shorten_never_duplicates_codes() {
    for strategy in [CodeStrategy::Random, CodeStrategy::Sequence] {
        let code_settings = CodeSettings {
            strategy,
            ..CodeSettings::default()
        };
        let (shortener, _resolver, repo) = services(code_settings, common::test_settings());

        let mut tasks = JoinSet::new();
        for i in 0..200 {
            let shortener = shortener.clone();
            tasks.spawn(async move {
                shortener
                    .shorten(&format!("https://example.com/{}", i))
                    .await
                    .unwrap()
                    .code
            });
        }

        let mut codes = HashSet::new();
        while let Some(code) = tasks.join_next().await {
            assert!(codes.insert(code.unwrap()), "duplicate code issued");
        }

        assert_eq!(codes.len(), 200);
        assert_eq!(repo.count().await.unwrap(), 200);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolve_counts_every_visit() {
    let (shortener, resolver, repo) = default_services();
    let link = shortener.shorten("https://example.com/hot").await.unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..100 {
        let resolver = resolver.clone();
        let code = link.code.clone();
        tasks.spawn(async move { resolver.resolve(&code).await.unwrap() });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap(), "https://example.com/hot");
    }

    let stored = repo.find(&link.code).await.unwrap().unwrap();
    assert_eq!(stored.visit_count, 100);
}

#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let (shortener, _resolver, repo) = default_services();

    for input in ["", "not a url", "ftp://x"] {
        let result = shortener.shorten(input).await;
        assert!(
            matches!(result, Err(AppError::InvalidUrl { .. })),
            "{:?} should be rejected",
            input
        );
    }

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ftp_accepted_when_allowed() {
    let mut settings = common::test_settings();
    settings.allowed_schemes.push("ftp".to_string());
    let (shortener, _resolver, _repo) = services(CodeSettings::default(), settings);

    let link = shortener.shorten("ftp://x").await.unwrap();

    assert!(link.destination.starts_with("ftp://x"));
}

#[tokio::test]
async fn test_resolve_unknown_code() {
    let (_shortener, resolver, _repo) = default_services();

    let result = resolver.resolve("doesnotexist").await;

    assert!(matches!(result, Err(AppError::UnknownCode { .. })));
}

#[tokio::test]
async fn test_sequence_exhausts_small_code_space() {
    let code_settings = CodeSettings {
        alphabet: "ab".to_string(),
        min_length: 1,
        max_length: 1,
        strategy: CodeStrategy::Sequence,
    };
    let (shortener, _resolver, repo) = services(code_settings, common::test_settings());

    let first = shortener.shorten("https://example.com/1").await.unwrap();
    let second = shortener.shorten("https://example.com/2").await.unwrap();
    assert_ne!(first.code, second.code);

    let result = shortener.shorten("https://example.com/full").await;

    assert!(matches!(result, Err(AppError::GenerationExhausted { .. })));
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_random_gives_up_when_every_code_is_taken() {
    let code_settings = CodeSettings {
        alphabet: "ab".to_string(),
        min_length: 1,
        max_length: 1,
        strategy: CodeStrategy::Random,
    };
    let (shortener, _resolver, repo) = services(code_settings, common::test_settings());
    common::create_test_link(&repo, "a", "https://example.com/a").await;
    common::create_test_link(&repo, "b", "https://example.com/b").await;

    let result = shortener.shorten("https://example.com/full").await;

    assert!(matches!(
        result,
        Err(AppError::GenerationExhausted { attempts: 10 })
    ));
}

#[tokio::test]
async fn test_scheme_less_redirect_url_round_trips() {
    let (shortener, resolver, _repo) = default_services();

    let link = shortener
        .shorten("example.com/r?to=https://x.org")
        .await
        .unwrap();
    assert_eq!(link.destination, "https://example.com/r?to=https://x.org");

    let destination = resolver.resolve(&link.code).await.unwrap();
    assert_eq!(destination, "https://example.com/r?to=https://x.org");
}
