//! Managed directory for Functional Reach Test recordings.
//!
//! Only video files with an allowed extension are accepted. Stored files keep
//! their original name (final path component only); a later upload with the
//! same name replaces the earlier one.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::error::UploadError;

/// Extensions accepted for recordings (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// A recording placed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVideo {
    /// Name within the store.
    pub filename: String,
    /// Full path on disk.
    pub path: PathBuf,
    pub size: u64,
}

/// File-backed store for uploaded recordings.
#[derive(Debug, Clone)]
pub struct VideoStore {
    base_path: PathBuf,
}

impl VideoStore {
    /// Create a store rooted at `base_path`.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Ensure the store directory exists.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Path a stored file with this name lives at.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }

    /// Store uploaded bytes under the client-supplied file name.
    pub async fn store_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<StoredVideo, UploadError> {
        let filename = accepted_name(file_name)?;
        let path = self.resolve(&filename);
        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, bytes).await?;
        info!(filename = %filename, size = bytes.len(), "Video stored");
        Ok(StoredVideo {
            filename,
            path,
            size: bytes.len() as u64,
        })
    }

    /// Copy a video from elsewhere on disk into the store.
    pub async fn store_file(&self, source: &Path) -> Result<StoredVideo, UploadError> {
        if !fs::metadata(source).await.is_ok_and(|m| m.is_file()) {
            warn!(source = %source.display(), "Video source not found");
            return Err(UploadError::MissingFile(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::InvalidFileName(source.display().to_string()))?;
        let filename = accepted_name(file_name)?;
        let path = self.resolve(&filename);
        fs::create_dir_all(&self.base_path).await?;
        let size = fs::copy(source, &path).await?;
        info!(filename = %filename, source = %source.display(), size, "Video copied into store");
        Ok(StoredVideo {
            filename,
            path,
            size,
        })
    }
}

/// Reduce a client-supplied name to its final component and check its extension.
fn accepted_name(file_name: &str) -> Result<String, UploadError> {
    // Browsers on Windows may send a full path with backslashes.
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(UploadError::InvalidFileName(file_name.to_string()));
    }

    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        warn!(file_name, extension = %extension, "Rejected upload with unsupported extension");
        return Err(UploadError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{extension}")
            },
            allowed: ALLOWED_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    Ok(name.to_string())
}
