//! Contract between the request flows and whatever displays their results

use crate::studio::upload::UploadedImage;

/// An image ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Accessible description shown alongside the image
    pub alt_text: String,
}

/// Display surface driven by the studio.
///
/// Implementations use interior mutability; the studio only holds a shared
/// reference. `end_loading` must be harmless when no loading was started.
pub trait ResultRenderer: Send + Sync {
    fn begin_loading(&self);

    fn end_loading(&self);

    /// Replace whatever is displayed with an error message
    fn show_error(&self, message: &str);

    fn append_image(&self, image: RenderedImage);

    /// Drop displayed results and errors
    fn clear_results(&self);

    fn show_edit_controls(&self, visible: bool);

    /// Show the pending upload, or hide the preview when `None`
    fn show_preview(&self, image: Option<&UploadedImage>);
}
