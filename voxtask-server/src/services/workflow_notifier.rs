//! Workflow notifier
//!
//! After an upload is stored, the external automation workflow is told
//! about the new file with a JSON POST. The call is best-effort: failures
//! are logged and dropped, and the upload response never waits for it.

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Outbound request timeout
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("voxtask/", env!("CARGO_PKG_VERSION"));

/// Notification failures
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Workflow endpoint returned HTTP {0}")]
    Status(u16),
}

/// Body sent to the workflow endpoint
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowNotification {
    pub file: String,
    pub timestamp: String,
}

impl WorkflowNotification {
    pub fn now(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

/// Client for the automation endpoint
#[derive(Clone)]
pub struct WorkflowNotifier {
    http_client: reqwest::Client,
    endpoint: Option<String>,
}

impl WorkflowNotifier {
    pub fn new(endpoint: Option<String>) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(NOTIFY_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// POST the notification and wait for the result
    ///
    /// Returns `Ok(false)` when no endpoint is configured.
    pub async fn notify(&self, file_name: &str) -> Result<bool, NotifyError> {
        let Some(endpoint) = &self.endpoint else {
            debug!(file = file_name, "No workflow endpoint configured, skipping notification");
            return Ok(false);
        };

        let response = self
            .http_client
            .post(endpoint)
            .json(&WorkflowNotification::now(file_name))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        info!(file = file_name, status = status.as_u16(), "Workflow notified");
        Ok(true)
    }

    /// Notify from a detached task
    ///
    /// The outcome is only visible in the logs.
    pub fn notify_detached(&self, file_name: String) {
        if !self.is_configured() {
            debug!(file = %file_name, "No workflow endpoint configured, skipping notification");
            return;
        }

        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&file_name).await {
                warn!(file = %file_name, "Workflow notification failed: {}", e);
            }
        });
    }
}
