//! voxtask-server library
//!
//! Task list API, audio upload intake, GitHub deploy webhook and the static
//! frontend, served from one axum router.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::services::{DeployLauncher, ScriptLauncher, WorkflowNotifier};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Where uploaded recordings are written
    pub upload_dir: PathBuf,
    /// Root of the frontend files
    pub static_dir: PathBuf,
    /// Upload request body limit
    pub max_upload_bytes: usize,
    /// GitHub webhook secret; `None` makes the webhook answer 500
    pub webhook_secret: Option<String>,
    /// Outbound notifications to the automation workflow
    pub notifier: WorkflowNotifier,
    /// Starts the redeploy script
    pub deployer: Arc<dyn DeployLauncher>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Build state from resolved configuration
    ///
    /// Creates the upload directory if it is missing.
    pub fn new(db: SqlitePool, config: &ServerConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.upload_dir)?;
        let notifier = WorkflowNotifier::new(config.workflow_url.clone())?;

        Ok(Self {
            db,
            upload_dir: config.upload_dir.clone(),
            static_dir: config.static_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
            webhook_secret: config.webhook_secret.clone(),
            notifier,
            deployer: Arc::new(ScriptLauncher::new(config.deploy_script.clone())),
            startup_time: Utc::now(),
        })
    }

    /// Replace the deploy launcher
    pub fn with_deployer(mut self, deployer: Arc<dyn DeployLauncher>) -> Self {
        self.deployer = deployer;
        self
    }
}

/// Build application router
///
/// API routes take precedence; every other path is looked up in the static
/// directory (`/` serves `index.html`, missing files are 404).
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(api::task_routes())
        .merge(api::upload_routes(state.max_upload_bytes))
        .merge(api::webhook_routes())
        .merge(api::health_routes())
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
