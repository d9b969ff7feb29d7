//! In-memory renderer tracking the view state

use parking_lot::Mutex;

use crate::response::renderer::{RenderedImage, ResultRenderer};
use crate::studio::upload::UploadedImage;

/// What the results area currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Results(Vec<RenderedImage>),
    Error(String),
}

#[derive(Debug, Default)]
struct Inner {
    loading: bool,
    images: Vec<RenderedImage>,
    error: Option<String>,
    edit_controls: bool,
    preview: Option<UploadedImage>,
}

/// Renderer that keeps the results area in memory for embedders to read back
#[derive(Debug, Default)]
pub struct StateRenderer {
    inner: Mutex<Inner>,
}

impl StateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view. Loading wins over anything collected so far.
    pub fn view(&self) -> ViewState {
        let inner = self.inner.lock();
        if inner.loading {
            ViewState::Loading
        } else if let Some(message) = &inner.error {
            ViewState::Error(message.clone())
        } else if inner.images.is_empty() {
            ViewState::Idle
        } else {
            ViewState::Results(inner.images.clone())
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    pub fn images(&self) -> Vec<RenderedImage> {
        self.inner.lock().images.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.lock().error.clone()
    }

    pub fn edit_controls_visible(&self) -> bool {
        self.inner.lock().edit_controls
    }

    pub fn preview(&self) -> Option<UploadedImage> {
        self.inner.lock().preview.clone()
    }
}

impl ResultRenderer for StateRenderer {
    fn begin_loading(&self) {
        let mut inner = self.inner.lock();
        inner.loading = true;
        inner.images.clear();
        inner.error = None;
    }

    fn end_loading(&self) {
        self.inner.lock().loading = false;
    }

    fn show_error(&self, message: &str) {
        let mut inner = self.inner.lock();
        inner.images.clear();
        inner.error = Some(message.to_string());
    }

    fn append_image(&self, image: RenderedImage) {
        self.inner.lock().images.push(image);
    }

    fn clear_results(&self) {
        let mut inner = self.inner.lock();
        inner.images.clear();
        inner.error = None;
    }

    fn show_edit_controls(&self, visible: bool) {
        self.inner.lock().edit_controls = visible;
    }

    fn show_preview(&self, image: Option<&UploadedImage>) {
        self.inner.lock().preview = image.cloned();
    }
}
