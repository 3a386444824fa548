//! Configuration resolution for voxtask-server
//!
//! Each setting is taken from the first source that provides it:
//! command line → environment variable → TOML config → compiled default.
//! clap covers the first two tiers; [`ServerConfig::resolve`] merges in the
//! TOML file and the defaults.

use clap::Parser;
use std::path::PathBuf;
use voxtask_common::config::{non_blank, resolve_root_folder, RootFolder, TomlConfig};

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default redeploy script, relative to the working directory
pub const DEFAULT_DEPLOY_SCRIPT: &str = "./deploy.sh";

/// Default upload body limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Command-line arguments for voxtask-server
#[derive(Parser, Debug, Default)]
#[command(name = "voxtask-server")]
#[command(about = "Voice-recorded task list backend")]
#[command(version)]
pub struct Args {
    /// TOML config file
    #[arg(short, long, env = "VOXTASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root folder holding the database and uploads
    #[arg(short, long, env = "VOXTASK_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "VOXTASK_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "VOXTASK_PORT")]
    pub port: Option<u16>,

    /// Directory of the frontend (index.html and assets)
    #[arg(long, env = "VOXTASK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Script launched on a verified push to main
    #[arg(long, env = "VOXTASK_DEPLOY_SCRIPT")]
    pub deploy_script: Option<PathBuf>,

    /// Automation endpoint notified after each upload
    #[arg(long, env = "WORKFLOW_WEBHOOK_URL")]
    pub workflow_url: Option<String>,

    /// Shared secret for GitHub webhook signatures
    #[arg(long, env = "GITHUB_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_folder: RootFolder,
    pub bind: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub deploy_script: PathBuf,
    pub workflow_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge command-line/environment values with the TOML config
    pub fn resolve(args: &Args, toml_config: TomlConfig) -> Self {
        let root_folder = RootFolder::new(resolve_root_folder(
            args.root_folder.as_deref(),
            &toml_config,
        ));

        let static_dir = args
            .static_dir
            .clone()
            .or(toml_config.static_dir)
            .unwrap_or_else(|| root_folder.static_path());

        let upload_dir = toml_config
            .upload_dir
            .unwrap_or_else(|| root_folder.uploads_path());

        Self {
            bind: args
                .bind
                .clone()
                .or(toml_config.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            static_dir,
            upload_dir,
            deploy_script: args
                .deploy_script
                .clone()
                .or(toml_config.deploy_script)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEPLOY_SCRIPT)),
            workflow_url: non_blank(args.workflow_url.clone())
                .or_else(|| non_blank(toml_config.workflow_url)),
            webhook_secret: non_blank(args.webhook_secret.clone())
                .or_else(|| non_blank(toml_config.webhook_secret)),
            max_upload_bytes: toml_config
                .max_upload_bytes
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            log_level: toml_config.logging.level,
            root_folder,
        }
    }

    /// Defaults rooted at `path`, used by tests and embedding callers
    pub fn with_root_folder(path: PathBuf) -> Self {
        let toml_config = TomlConfig {
            root_folder: Some(path),
            ..Default::default()
        };
        Self::resolve(&Args::default(), toml_config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
