use axum::http::StatusCode;
use campus_vote::api::{self, AppState};
use campus_vote::config::Config;
use campus_vote::db::init_db;
use campus_vote::Repository;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let mut env = HashMap::new();
    env.insert("DATABASE_PATH".to_string(), db_path);
    let config = Config::from_env_map(env).unwrap();
    let state = AppState::new(repo.clone(), config);

    (api::create_router(state), repo, temp_dir)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let request = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _repo, _temp) = setup_test_app().await;
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn test_ready_endpoint() {
    let (app, _repo, _temp) = setup_test_app().await;
    let (status, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ready"));
}

#[tokio::test]
async fn test_ready_reports_unavailable_store() {
    let (app, repo, _temp) = setup_test_app().await;
    repo.pool().close().await;

    let (status, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("unavailable"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _repo, _temp) = setup_test_app().await;
    let (status, _) = get(app, "/v1/trades").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
