//! Cover image previews read from the local filesystem.

use crate::draft::CoverImage;
use crate::environment::{CollaboratorError, CollaboratorFuture, ImageLoader};
use base64::Engine;
use std::path::Path;

/// Default upper bound on a cover image (5 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Builds `data:` URL previews from image files
#[derive(Clone, Debug)]
pub struct FileImageLoader {
    max_bytes: u64,
}

impl FileImageLoader {
    /// Loader rejecting files larger than `max_bytes`
    #[must_use]
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Size limit in bytes
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl Default for FileImageLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES)
    }
}

/// MIME type for a supported image extension
#[must_use]
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        Some("gif") => Some("image/gif"),
        Some("webp") => Some("image/webp"),
        _ => None,
    }
}

impl ImageLoader for FileImageLoader {
    fn load_preview<'a>(&'a self, path: &'a Path) -> CollaboratorFuture<'a, CoverImage> {
        Box::pin(async move {
            let mime = image_mime_type(path).ok_or_else(|| {
                CollaboratorError::Invalid(format!("Not a supported image: {}", path.display()))
            })?;

            let metadata = tokio::fs::metadata(path)
                .await
                .map_err(|e| CollaboratorError::Io(format!("Failed to read file metadata: {e}")))?;
            if metadata.len() > self.max_bytes {
                return Err(CollaboratorError::Invalid(format!(
                    "Image too large ({} bytes, limit {})",
                    metadata.len(),
                    self.max_bytes
                )));
            }

            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| CollaboratorError::Io(format!("Failed to read file: {e}")))?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            tracing::debug!(%file_name, bytes = bytes.len(), "Loaded cover image preview");

            Ok(CoverImage {
                file_name,
                preview: format!("data:{mime};base64,{encoded}"),
            })
        })
    }
}
