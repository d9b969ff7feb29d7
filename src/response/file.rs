//! Terminal renderer that stores rendered images on disk

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::Result;
use crate::response::renderer::{RenderedImage, ResultRenderer};
use crate::studio::upload::UploadedImage;

/// Renderer for the command-line front end.
///
/// Images are written to the storage directory; progress and errors go to the terminal.
pub struct FileRenderer {
    storage_path: PathBuf,
}

impl FileRenderer {
    /// Create a new file renderer
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// Ensure the storage directory exists
    pub fn ensure_storage_dir(&self) -> Result<()> {
        if !self.storage_path.exists() {
            fs::create_dir_all(&self.storage_path)?;
            debug!(path = ?self.storage_path, "Created storage directory");
        }
        Ok(())
    }

    /// Save raw image data to a uniquely named file
    pub fn save(&self, image: &RenderedImage) -> Result<PathBuf> {
        self.ensure_storage_dir()?;

        let extension = extension_for_mime(&image.mime_type)
            .or_else(|| detect_image_format(&image.bytes).and_then(extension_for_mime))
            .unwrap_or("bin");

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = self.storage_path.join(&filename);
        fs::write(&file_path, &image.bytes)?;

        debug!(path = ?file_path, size = image.bytes.len(), "Saved image file");
        Ok(file_path)
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }
}

impl ResultRenderer for FileRenderer {
    fn begin_loading(&self) {
        println!("Working...");
    }

    fn end_loading(&self) {
        debug!("Loading finished");
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn append_image(&self, image: RenderedImage) {
        match self.save(&image) {
            Ok(path) => println!("{} -> {}", image.alt_text, path.display()),
            Err(e) => error!(error = %e, alt = %image.alt_text, "Failed to save image"),
        }
    }

    fn clear_results(&self) {
        debug!("Results cleared");
    }

    fn show_edit_controls(&self, visible: bool) {
        if visible {
            println!("Edit mode: `upload <path>` an image, then `edit <prompt>`.");
        }
    }

    fn show_preview(&self, image: Option<&UploadedImage>) {
        if let Some(image) = image {
            info!(mime = %image.mime_type, size = image.data.len(), "Upload ready");
            println!("Uploaded {} ({} bytes)", image.mime_type, image.data.len());
        }
    }
}

/// File extension for an image media type
pub(crate) fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

/// Detect image media type from binary data using magic bytes
pub(crate) fn detect_image_format(data: &[u8]) -> Option<&'static str> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }

    None
}
