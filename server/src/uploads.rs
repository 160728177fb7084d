//! Photo uploads stored on disk under the static root.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use genie_core::InlineImage;
use image::{ImageFormat, ImageReader};
use thiserror::Error;
use uuid::Uuid;

/// Subdirectory of the static root uploads are written to.
pub const UPLOAD_SUBDIR: &str = "uploads";

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const ALLOWED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file selected")]
    Empty,

    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),

    #[error("Not a PNG or JPEG image")]
    UnrecognizedImage,

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Path relative to the static root, as stored on the recipe.
    pub image_path: String,
    pub file_path: PathBuf,
    pub mime_type: &'static str,
}

/// Lowercased extension of `filename` if it is one we accept.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Detect the image format from magic bytes.
pub fn detect_mime(data: &[u8]) -> Result<&'static str, UploadError> {
    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| UploadError::UnrecognizedImage)?
        .format()
        .ok_or(UploadError::UnrecognizedImage)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(UploadError::UnrecognizedImage);
    }

    Ok(format.to_mime_type())
}

/// Validate and write an upload under a fresh unique name.
pub async fn save_upload(
    upload_dir: &Path,
    filename: &str,
    data: &[u8],
) -> Result<StoredUpload, UploadError> {
    if filename.trim().is_empty() || data.is_empty() {
        return Err(UploadError::Empty);
    }

    let ext = allowed_extension(filename)
        .ok_or_else(|| UploadError::DisallowedExtension(filename.to_string()))?;
    let mime_type = detect_mime(data)?;

    tokio::fs::create_dir_all(upload_dir).await?;

    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = upload_dir.join(&stored_name);
    tokio::fs::write(&file_path, data).await?;

    tracing::debug!(path = %file_path.display(), mime_type, "Stored upload");

    Ok(StoredUpload {
        image_path: format!("{}/{}", UPLOAD_SUBDIR, stored_name),
        file_path,
        mime_type,
    })
}

/// Delete an upload that no recipe will reference.
pub async fn remove_upload(upload: &StoredUpload) {
    if let Err(e) = tokio::fs::remove_file(&upload.file_path).await {
        tracing::warn!(
            path = %upload.file_path.display(),
            "Failed to remove orphaned upload: {}",
            e
        );
    }
}

impl StoredUpload {
    pub fn inline_image(&self, data: Vec<u8>) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.to_string(),
            data,
        }
    }
}
