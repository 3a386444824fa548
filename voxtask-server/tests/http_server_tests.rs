//! HTTP Server & Routing Integration Tests
//!
//! Static frontend serving, health endpoint, and route precedence.

mod helpers;

use axum::http::StatusCode;
use helpers::{json, text, TestApp};

async fn app_with_frontend() -> TestApp {
    let app = TestApp::new().await;
    let static_dir = &app.config.static_dir;
    std::fs::create_dir_all(static_dir.join("js")).unwrap();
    std::fs::write(
        static_dir.join("index.html"),
        "<!doctype html><title>voxtask</title><button id=\"record-button\">Record</button>",
    )
    .unwrap();
    std::fs::write(static_dir.join("js").join("main.js"), "console.log('voxtask');").unwrap();
    app
}

#[tokio::test]
async fn test_root_serves_index() {
    let app = app_with_frontend().await;

    let response = app.get("/").await;
    assert_eq!(response.0, StatusCode::OK);
    assert!(text(&response.1).contains("record-button"));
}

#[tokio::test]
async fn test_nested_asset_is_served() {
    let app = app_with_frontend().await;

    let (status, body) = app.get("/js/main.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "console.log('voxtask');");
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let app = app_with_frontend().await;

    let (status, _) = app.get("/css/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_static_dir_is_404_not_error() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_routes_take_precedence_over_static() {
    let app = app_with_frontend().await;
    std::fs::create_dir_all(app.config.static_dir.join("api")).unwrap();
    std::fs::write(app.config.static_dir.join("api").join("tasks"), "shadow").unwrap();

    let (status, body) = app.get("/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!([]));
}

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let health = json(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["module"], "voxtask-server");
    assert!(health["version"].is_string());
    assert!(!health["commit"].as_str().unwrap().is_empty());
    assert!(health["uptime_seconds"].is_u64());
}
