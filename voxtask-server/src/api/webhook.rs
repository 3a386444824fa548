//! GitHub deploy webhook
//!
//! `POST /webhook`. The body is authenticated before anything in it is
//! parsed:
//! 1. `X-Hub-Signature-256` header present, else 403
//! 2. secret configured, else 500
//! 3. HMAC-SHA256 of the raw body matches (constant-time), else 403
//!
//! A verified push to `refs/heads/main` launches the deploy script (202);
//! any other ref is acknowledged with 200 and nothing runs.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use tracing::{error, info, warn};
use voxtask_common::signature::{verify_signature, SignatureError, SIGNATURE_HEADER};

use crate::{ApiError, ApiResult, AppState};

/// Ref that triggers a redeploy
pub const DEPLOY_REF: &str = "refs/heads/main";

/// GitHub caps webhook deliveries at 25 MB
pub const MAX_WEBHOOK_BYTES: usize = 25 * 1024 * 1024;

fn signature_error(e: SignatureError) -> ApiError {
    match e {
        SignatureError::SecretNotConfigured => {
            error!("Webhook received but no webhook secret is configured");
            ApiError::Internal(e.to_string())
        }
        other => {
            warn!("Webhook rejected: {}", other);
            ApiError::Forbidden(other.to_string())
        }
    }
}

/// POST /webhook
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, &'static str)> {
    // A header that is not valid UTF-8 cannot carry a hex digest
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|value| value.to_str().unwrap_or_default());

    verify_signature(state.webhook_secret.as_deref(), signature, &body)
        .map_err(signature_error)?;

    let event: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid webhook payload: {}", e)))?;

    // Anything that is not the string "refs/heads/main" is a no-op
    let git_ref = event.get("ref").and_then(Value::as_str);
    if git_ref != Some(DEPLOY_REF) {
        info!(git_ref = ?git_ref, "Push is not to main, no deploy");
        return Ok((StatusCode::OK, "No update needed"));
    }

    let commit = event.get("after").and_then(Value::as_str);
    info!(commit = ?commit, "Verified push to main, starting deploy");
    state.deployer.launch();

    Ok((StatusCode::ACCEPTED, "Deployment started"))
}

/// Build webhook routes
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(github_webhook))
        .layer(DefaultBodyLimit::max(MAX_WEBHOOK_BYTES))
}
