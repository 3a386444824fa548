//! Services used by the HTTP handlers

pub mod deployer;
pub mod uploads;
pub mod workflow_notifier;

pub use deployer::{DeployLauncher, ScriptLauncher};
pub use uploads::{save_upload, StoredUpload};
pub use workflow_notifier::{NotifyError, WorkflowNotifier};
