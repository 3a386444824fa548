//! Redeploy launcher
//!
//! A verified push to main starts the deploy script in a detached task. The
//! webhook handler returns as soon as the task is spawned; spawn failures
//! and the script's exit status only show up in the logs.

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info, warn};

/// Starts a redeploy without waiting for it
pub trait DeployLauncher: Send + Sync {
    fn launch(&self);
}

/// Runs a script on the local machine
#[derive(Debug, Clone)]
pub struct ScriptLauncher {
    script: PathBuf,
}

impl ScriptLauncher {
    pub fn new(script: PathBuf) -> Self {
        Self { script }
    }

    async fn run(script: PathBuf) {
        let child = Command::new(&script)
            .stdin(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                error!(script = %script.display(), "Failed to launch deploy script: {}", e);
                return;
            }
        };

        info!(script = %script.display(), pid = ?child.id(), "Deploy script started");

        match child.wait().await {
            Ok(status) if status.success() => {
                info!(script = %script.display(), "Deploy script finished");
            }
            Ok(status) => {
                warn!(script = %script.display(), %status, "Deploy script exited with failure");
            }
            Err(e) => {
                error!(script = %script.display(), "Waiting on deploy script failed: {}", e);
            }
        }
    }
}

impl DeployLauncher for ScriptLauncher {
    fn launch(&self) {
        tokio::spawn(Self::run(self.script.clone()));
    }
}
