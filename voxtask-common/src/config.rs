//! Configuration loading and root folder resolution
//!
//! Settings are resolved in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Tiers 1 and 2 are parsed by the binary (clap with `env`), so this module
//! only deals with the TOML file and the compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Application directory name used below the platform config/data folders
pub const APP_DIR_NAME: &str = "voxtask";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "voxtask.db";

/// Bootstrap configuration loaded from the TOML file
///
/// Every field is optional. Missing fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Root folder holding the database and uploads
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[serde(default)]
    pub bind: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Directory of the single-page frontend
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Directory receiving uploaded recordings
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// Redeploy script launched by the webhook
    #[serde(default)]
    pub deploy_script: Option<PathBuf>,

    /// Automation endpoint notified after each upload
    #[serde(default)]
    pub workflow_url: Option<String>,

    /// Shared secret for webhook signatures
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Upper bound for upload request bodies
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Where the bootstrap configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No config file present, compiled defaults apply
    Defaults,
    /// A config file existed but could not be used; defaults apply
    Failed(String),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "config file {}", path.display()),
            ConfigSource::Defaults => write!(f, "compiled defaults (no config file found)"),
            ConfigSource::Failed(reason) => write!(f, "compiled defaults ({})", reason),
        }
    }
}

/// Load the TOML config, falling back to defaults on any problem
///
/// A missing or broken config file never stops startup. `explicit` is the
/// path given on the command line or via environment; when absent the
/// platform default location is tried. Nothing is logged here because this
/// runs before the tracing subscriber exists; callers log the returned
/// [`ConfigSource`].
pub fn load_bootstrap_config(explicit: Option<&Path>) -> (TomlConfig, ConfigSource) {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return (TomlConfig::default(), ConfigSource::Defaults),
        },
    };

    match load_toml_config(&path) {
        Ok(config) => (config, ConfigSource::File(path)),
        Err(e) => (TomlConfig::default(), ConfigSource::Failed(e.to_string())),
    }
}

/// Locate an existing config file in the platform default locations
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR_NAME).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./voxtask_data"))
}

/// Resolve the root folder from CLI/env value, TOML, then default
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }
    default_root_folder()
}

/// Treat blank strings as unset
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Root folder layout helper
///
/// Owns the on-disk locations derived from the resolved root folder.
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the root folder if it does not exist
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)?;
            info!("Created root folder: {}", self.path.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.path.join(DATABASE_FILE_NAME)
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.path.join("uploads")
    }

    pub fn static_path(&self) -> PathBuf {
        self.path.join("static")
    }
}
