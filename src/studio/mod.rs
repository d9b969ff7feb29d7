//! Studio controller: model selection, pending upload, and the two request flows
//!
//! All mutable state lives behind one mutex that is never held across an
//! await. A separate in-flight flag makes sure only one request runs at a
//! time; overlapping triggers are refused with [`AppError::RequestInFlight`].

pub mod edit;
pub mod generate;
pub mod mode;
pub mod upload;

use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::traits::ImageBackend;
use crate::error::{AppError, Result};
use crate::response::renderer::ResultRenderer;

pub use mode::{Mode, ModelId};
pub use upload::{read_image_file, UploadStore, UploadedImage};

struct StudioState {
    model: ModelId,
    upload: UploadStore,
    prompt: String,
}

/// Owns the UI-facing state and drives requests against a backend
pub struct Studio {
    backend: Arc<dyn ImageBackend>,
    renderer: Arc<dyn ResultRenderer>,
    state: Mutex<StudioState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Studio {
    /// Create a studio with the first catalog model selected
    pub fn new(backend: Arc<dyn ImageBackend>, renderer: Arc<dyn ResultRenderer>) -> Self {
        Self {
            backend,
            renderer,
            state: Mutex::new(StudioState {
                model: ModelId::default(),
                upload: UploadStore::new(),
                prompt: String::new(),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Apply the startup selection
    pub async fn start(&self) -> Result<usize> {
        info!(backend = %self.backend.name(), "Starting studio");
        self.set_mode(ModelId::default()).await
    }

    pub fn model(&self) -> ModelId {
        self.state.lock().model
    }

    pub fn mode(&self) -> Mode {
        self.model().mode()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Select a model.
    ///
    /// Switching to the editing model drops the pending upload and the prompt
    /// draft. Any other model hides the edit controls and immediately
    /// generates with it; the returned count is the number of images rendered.
    pub async fn set_mode(&self, model: ModelId) -> Result<usize> {
        let _guard = self.try_begin()?;

        {
            let mut state = self.state.lock();
            state.model = model;
            if model.mode() == Mode::Edit {
                state.upload.clear();
                state.prompt.clear();
            }
        }
        debug!(model = %model, mode = ?model.mode(), "Mode selected");

        self.renderer.clear_results();
        match model.mode() {
            Mode::Edit => {
                self.renderer.show_preview(None);
                self.renderer.show_edit_controls(true);
                Ok(0)
            }
            Mode::Generate => {
                self.renderer.show_edit_controls(false);
                self.run_generate(model).await
            }
        }
    }

    pub fn prompt(&self) -> String {
        self.state.lock().prompt.clone()
    }

    /// Replace the prompt draft used by the next edit request
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.state.lock().prompt = prompt.into();
    }

    pub fn upload(&self) -> Option<UploadedImage> {
        self.state.lock().upload.get().cloned()
    }

    /// Make `image` the pending upload, replacing any previous one
    pub fn set_upload(&self, image: UploadedImage) {
        self.renderer.show_preview(Some(&image));
        self.state.lock().upload.set(image);
    }

    pub fn clear_upload(&self) {
        self.state.lock().upload.clear();
        self.renderer.show_preview(None);
    }

    /// Read an image file into the upload slot. The slot is unchanged on failure.
    ///
    /// Refused while a request is in flight so a failed read cannot replace
    /// results that are still being rendered.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_idle()?;
        match read_image_file(path).await {
            Ok(image) => {
                self.set_upload(image);
                Ok(())
            }
            Err(e) => Err(self.report_upload_failure(e)),
        }
    }

    /// Decode a base64 data URL into the upload slot. The slot is unchanged on failure.
    pub fn upload_data_url(&self, data_url: &str) -> Result<()> {
        self.ensure_idle()?;
        match UploadedImage::from_data_url(data_url) {
            Ok(image) => {
                self.set_upload(image);
                Ok(())
            }
            Err(e) => Err(self.report_upload_failure(e)),
        }
    }

    fn report_upload_failure(&self, error: AppError) -> AppError {
        warn!(error = %error, "Upload rejected");
        // A request may have started while the file was being read
        if self.is_busy() {
            return error;
        }
        self.report(error)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_busy() {
            debug!("Ignoring upload while a request is in flight");
            return Err(AppError::RequestInFlight);
        }
        Ok(())
    }

    /// Show `error` to the user and hand it back for the caller
    fn report(&self, error: AppError) -> AppError {
        self.renderer.show_error(&error.to_string());
        error
    }

    fn try_begin(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                debug!("Ignoring trigger while a request is in flight");
                AppError::RequestInFlight
            })?;
        Ok(InFlightGuard(&self.in_flight))
    }
}
