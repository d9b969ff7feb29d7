//! Single-slot store for the image pending an edit request

use std::path::Path;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::response::base64;
use crate::response::file::detect_image_format;

/// A user-supplied image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Build an upload from a `data:<mime>;base64,<payload>` string
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (mime_type, data) = base64::parse_data_url(data_url.trim())
            .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
        Self::checked(data, mime_type)
    }

    fn checked(data: Vec<u8>, mime_type: String) -> Result<Self> {
        if data.is_empty() {
            return Err(AppError::InvalidUpload("file is empty".to_string()));
        }
        if !mime_type.starts_with("image/") {
            return Err(AppError::InvalidUpload(format!(
                "unsupported media type '{}'",
                mime_type
            )));
        }
        Ok(Self { data, mime_type })
    }
}

/// Read an image file, resolving its media type from the extension or the content
pub async fn read_image_file(path: impl AsRef<Path>) -> Result<UploadedImage> {
    let path = path.as_ref();
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::InvalidUpload(format!("{}: {}", path.display(), e)))?;

    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .or_else(|| detect_image_format(&data))
        .unwrap_or("application/octet-stream")
        .to_string();

    debug!(path = ?path, mime = %mime_type, size = data.len(), "Read upload");
    UploadedImage::checked(data, mime_type)
}

/// Holds at most one pending image. Setting a new one replaces the old.
#[derive(Debug, Default)]
pub struct UploadStore {
    current: Option<UploadedImage>,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, image: UploadedImage) {
        self.current = Some(image);
    }

    pub fn get(&self) -> Option<&UploadedImage> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
