mod common;

use axum_test::TestServer;
use suri::domain::repositories::LinkRepository;
use suri::routes::build_router;

#[tokio::test]
async fn test_redirect_success() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "redir2", "https://example.com/target").await;

    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/redir2").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_counts_visits() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "count2", "https://example.com/").await;

    let server = TestServer::new(build_router(state)).unwrap();

    for _ in 0..3 {
        assert_eq!(server.get("/count2").await.status_code(), 307);
    }

    let link = repo.find("count2").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 3);
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/doesnotexist").await;

    assert_eq!(response.status_code(), 404);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let (state, repo) = common::create_test_state();
    common::create_expired_link(&repo, "gone23", "https://example.com/").await;

    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/gone23").await;

    assert_eq!(response.status_code(), 410);
    let link = repo.find("gone23").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 0);
}

#[tokio::test]
async fn test_redirect_sets_request_id() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "reqid2", "https://example.com/").await;

    let server = TestServer::new(build_router(state)).unwrap();

    let generated = server.get("/reqid2").await;
    assert!(!generated.header("x-request-id").is_empty());

    let propagated = server
        .get("/reqid2")
        .add_header("x-request-id", "trace-123")
        .await;
    assert_eq!(propagated.header("x-request-id"), "trace-123");
}

#[tokio::test]
async fn test_shorten_then_redirect() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(build_router(state)).unwrap();

    let created = server
        .post("/api/shorten")
        .json(&serde_json::json!({ "url": "example.com/page" }))
        .await
        .json::<serde_json::Value>();
    let code = created["code"].as_str().unwrap();

    let response = server.get(&format!("/{}", code)).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/page");
}
