//! PostgreSQL store tests.
//!
//! These need a database: set `DATABASE_URL` and run with `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use suri::domain::entities::NewLink;
use suri::domain::repositories::LinkRepository;
use suri::error::AppError;
use suri::infrastructure::persistence::PgLinkRepository;
use tokio::task::JoinSet;

fn new_link(code: &str, destination: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        destination: destination.to_string(),
        expires_at: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_insert_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(new_link("test23", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(link.code, "test23");
    assert_eq!(link.destination, "https://example.com");
    assert_eq!(link.visit_count, 0);
    assert!(link.expires_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_insert_duplicate_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup234", "https://example.com/1"))
        .await
        .unwrap();
    let result = repo.insert(new_link("dup234", "https://example.com/2")).await;

    assert!(matches!(result, Err(AppError::DuplicateCode { code }) if code == "dup234"));

    let stored = repo.find("dup234").await.unwrap().unwrap();
    assert_eq!(stored.destination, "https://example.com/1");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_find_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let expires_at = Utc::now() + Duration::days(1);

    repo.insert(NewLink {
        code: "find23".to_string(),
        destination: "https://example.com/find".to_string(),
        expires_at: Some(expires_at),
    })
    .await
    .unwrap();

    let link = repo.find("find23").await.unwrap().unwrap();

    assert_eq!(link.destination, "https://example.com/find");
    assert!(link.expires_at.is_some());
    assert!(!link.is_expired());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_find_link_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.find("notfound").await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_increment_visit(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.insert(new_link("visit2", "https://example.com"))
        .await
        .unwrap();

    repo.increment_visit("visit2").await.unwrap();
    repo.increment_visit("visit2").await.unwrap();

    let link = repo.find("visit2").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_increment_visit_unknown_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.increment_visit("missing").await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    repo.insert(new_link("race23", "https://example.com"))
        .await
        .unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        tasks.spawn(async move { repo.increment_visit("race23").await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let link = repo.find("race23").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 50);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_exists_and_count(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(!repo.exists("cnt234").await.unwrap());

    repo.insert(new_link("cnt234", "https://example.com"))
        .await
        .unwrap();

    assert!(repo.exists("cnt234").await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);
}
