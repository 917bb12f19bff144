//! Multipart upload helper.
//!
//! Uploaded files land under the configured `UPLOAD_DIR`, in a per-resource
//! subdirectory. Filenames are prefixed with a UUID so client-supplied names
//! cannot collide or escape the directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A file persisted to the upload directory.
#[derive(Debug)]
pub struct StoredFile {
    /// Original client-supplied filename (sanitized).
    pub filename: String,
    /// Path of the stored file on disk.
    pub path: PathBuf,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Size of the stored file in bytes.
    pub size_bytes: i64,
}

/// Write one multipart field's bytes under `base_dir/subdir`.
///
/// The stored name is `<uuid>_<sanitized original name>`.
pub async fn store_field(
    base_dir: &Path,
    subdir: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> AppResult<StoredFile> {
    let original = sanitize_filename(filename.unwrap_or("upload.bin"));
    let dir = base_dir.join(subdir);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    let stored_name = format!("{}_{original}", Uuid::new_v4());
    let path = dir.join(&stored_name);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

    Ok(StoredFile {
        filename: original,
        path,
        content_type: content_type.map(str::to_string),
        size_bytes: data.len() as i64,
    })
}

/// Strip path separators and control characters from a client filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0') && !c.is_control())
        .collect();
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("plan.pdf"), "plan.pdf");
        assert_eq!(sanitize_filename(""), "upload.bin");
    }
}
