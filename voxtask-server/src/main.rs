//! voxtask-server - voice-recorded task list backend
//!
//! Serves the task API, accepts audio uploads for the automation workflow,
//! and redeploys itself when GitHub reports a push to main.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use voxtask_common::config::{load_bootstrap_config, ConfigSource};
use voxtask_server::config::{Args, ServerConfig};
use voxtask_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // TOML first so its log level can seed the subscriber
    let (toml_config, config_source) = load_bootstrap_config(args.config.as_deref());
    let config = ServerConfig::resolve(&args, toml_config);

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification immediately after tracing init
    info!(
        "Starting voxtask-server v{} [{}] built {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );

    match &config_source {
        ConfigSource::Failed(_) => warn!("Configuration: {}", config_source),
        _ => info!("Configuration: {}", config_source),
    }

    config
        .root_folder
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", config.root_folder.path().display());
    info!("Upload directory: {}", config.upload_dir.display());

    if config.static_dir.is_dir() {
        info!("Static files: {}", config.static_dir.display());
    } else {
        warn!(
            "Static directory {} does not exist; frontend requests will return 404",
            config.static_dir.display()
        );
    }

    match &config.workflow_url {
        Some(url) => info!("Workflow notifications enabled: {}", url),
        None => info!("Workflow notifications disabled (WORKFLOW_WEBHOOK_URL not set)"),
    }
    if config.webhook_secret.is_some() {
        info!("Deploy webhook enabled, script: {}", config.deploy_script.display());
    } else {
        warn!("GITHUB_WEBHOOK_SECRET not set; /webhook will answer 500");
    }

    let db_path = config.root_folder.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = voxtask_server::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let state = AppState::new(db_pool, &config)?;
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve when Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
