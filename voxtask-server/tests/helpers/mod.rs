//! Test Helper Utilities
//!
//! Shared utilities for router-level tests of voxtask-server

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use voxtask_server::config::ServerConfig;
use voxtask_server::services::DeployLauncher;
use voxtask_server::{build_router, AppState};

pub const TEST_SECRET: &str = "test-webhook-secret";

/// Deploy launcher that only counts invocations
#[derive(Default)]
pub struct CountingLauncher {
    launches: AtomicUsize,
}

impl CountingLauncher {
    pub fn count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl DeployLauncher for CountingLauncher {
    fn launch(&self) {
        self.launches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Application wired to a temporary root folder
///
/// The TempDir must stay alive for the duration of the test.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub config: ServerConfig,
    pub state: AppState,
    pub deploys: Arc<CountingLauncher>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_secret(Some(TEST_SECRET)).await
    }

    pub async fn with_secret(secret: Option<&str>) -> Self {
        Self::build(|config| config.webhook_secret = secret.map(str::to_string)).await
    }

    pub async fn build(customize: impl FnOnce(&mut ServerConfig)) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_root_folder(temp_dir.path().to_path_buf());
        customize(&mut config);

        config.root_folder.ensure_directory_exists().unwrap();
        let db = voxtask_server::db::init_database_pool(&config.root_folder.database_path())
            .await
            .unwrap();

        let deploys = Arc::new(CountingLauncher::default());
        let state = AppState::new(db, &config)
            .unwrap()
            .with_deployer(deploys.clone());

        Self {
            temp_dir,
            config,
            state,
            deploys,
        }
    }

    /// Send one request through a fresh router
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Bytes) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send_json(&self, method: &str, uri: &str, json: &Value) -> (StatusCode, Bytes) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Bytes) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Upload directory listing, sorted
    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.config.upload_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn json(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}

pub fn text(body: &Bytes) -> String {
    String::from_utf8_lossy(body).into_owned()
}

pub const BOUNDARY: &str = "voxtask-test-boundary";

/// One multipart part: (field name, optional filename, content)
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

/// Encode a multipart/form-data body
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: audio/webm\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}
