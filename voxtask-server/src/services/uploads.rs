//! Upload storage
//!
//! Recordings are written byte-for-byte to the upload directory under a
//! generated name `rec_<YYYYmmdd_HHMMSS>_<8 hex>.<ext>`. Nothing is recorded
//! in the database.

use chrono::{DateTime, Local};
use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Extension used when the client filename has none
pub const DEFAULT_EXTENSION: &str = "webm";

const MAX_EXTENSION_LEN: usize = 10;

/// Attempts before giving up on a name collision
const MAX_NAME_ATTEMPTS: usize = 5;

/// A stored upload
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Extension to keep from the client-supplied filename
///
/// Lowercased, ASCII alphanumeric only; anything else falls back to
/// [`DEFAULT_EXTENSION`].
pub fn file_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Generate an upload file name for `now`
///
/// 32 random bits keep names distinct for uploads within the same second.
pub fn upload_file_name(now: DateTime<Local>, extension: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!(
        "rec_{}_{:08x}.{}",
        now.format("%Y%m%d_%H%M%S"),
        suffix,
        extension
    )
}

/// Write `bytes` to a fresh file in `upload_dir`
///
/// Files are opened with `create_new`, so an existing recording is never
/// overwritten; a collision just draws another name.
pub async fn save_upload(
    upload_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<StoredUpload> {
    let extension = file_extension(original_name);

    for _ in 0..MAX_NAME_ATTEMPTS {
        let file_name = upload_file_name(Local::now(), &extension);
        let path = upload_dir.join(&file_name);

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        file.write_all(bytes).await?;
        file.flush().await?;

        return Ok(StoredUpload {
            file_name,
            path,
            size: bytes.len(),
        });
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "could not find a free upload file name",
    ))
}
