//! Audio upload endpoint
//!
//! `POST /upload` with a multipart field named `audio`. The file is stored
//! unchanged and the workflow endpoint is notified in the background.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::info;

use crate::services::save_upload;
use crate::{ApiError, ApiResult, AppState};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Uploaded recording as read from the request
struct ReceivedAudio {
    file_name: String,
    bytes: axum::body::Bytes,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

/// Find the `audio` field; other fields are skipped
async fn read_audio_field(multipart: &mut Multipart) -> ApiResult<ReceivedAudio> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::BadRequest("No selected file".to_string()))?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(ReceivedAudio { file_name, bytes });
    }

    Err(ApiError::BadRequest(format!(
        "No '{}' part in the request",
        AUDIO_FIELD
    )))
}

/// POST /upload
///
/// **Response:** 200 `File <name> uploaded successfully`
/// Missing field or empty filename → 400.
pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<String> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let audio = read_audio_field(&mut multipart).await?;

    let stored = save_upload(&state.upload_dir, &audio.file_name, &audio.bytes).await?;
    info!(
        file = %stored.file_name,
        client_name = %audio.file_name,
        bytes = stored.size,
        "Recording stored"
    );

    state.notifier.notify_detached(stored.file_name.clone());

    Ok(format!("File {} uploaded successfully", stored.file_name))
}

/// Build upload routes with their own body limit
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_audio))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
