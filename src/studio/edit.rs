//! Edit request flow: uploaded image + prompt in, mixed text/image parts out

use tracing::{debug, error, info, warn};

use crate::backend::traits::{ContentPart, EditRequest, EditResponse};
use crate::error::{AppError, Result};
use crate::response::renderer::RenderedImage;
use crate::studio::{Mode, Studio};

impl Studio {
    /// Send the pending upload and the prompt draft to the editing model.
    ///
    /// Inputs are checked before anything is sent: the upload first, then the
    /// trimmed prompt. Neither is consumed. Returns the number of images rendered.
    pub async fn submit_edit(&self) -> Result<usize> {
        let _guard = self.try_begin()?;

        let (model, image, prompt) = {
            let state = self.state.lock();
            (
                state.model,
                state.upload.get().cloned(),
                state.prompt.trim().to_string(),
            )
        };

        if model.mode() != Mode::Edit {
            return Err(self.report(AppError::UnsupportedModel(model.to_string())));
        }
        let Some(image) = image else {
            return Err(self.report(AppError::NoImageUploaded));
        };
        if prompt.is_empty() {
            return Err(self.report(AppError::NoPromptProvided));
        }

        info!(model = %model, mime = %image.mime_type, "Editing image");
        self.renderer.begin_loading();

        let request = EditRequest {
            model: model.to_string(),
            image,
            prompt: prompt.clone(),
        };

        let outcome = match self.backend.edit_image(request).await {
            Ok(response) => self.render_edit(response, &prompt),
            Err(e) => {
                error!(model = %model, error = %e, "Edit request failed");
                Err(self.report(AppError::EditFailed))
            }
        };

        self.renderer.end_loading();
        outcome
    }

    fn render_edit(&self, response: EditResponse, prompt: &str) -> Result<usize> {
        if response.parts.is_empty() {
            warn!(
                finish_reason = ?response.finish_reason,
                block_reason = ?response.block_reason,
                "Edit response had no content"
            );
            return Err(self.report(AppError::NoImageGenerated));
        }

        let mut rendered = 0;
        for part in response.parts {
            match part {
                ContentPart::Image(image) => {
                    self.renderer.append_image(RenderedImage {
                        bytes: image.bytes,
                        mime_type: image.mime_type,
                        alt_text: prompt.to_string(),
                    });
                    rendered += 1;
                }
                ContentPart::Text(text) => info!(text = %text, "Model returned text"),
                ContentPart::Empty => debug!("Skipping empty part"),
            }
        }

        if rendered == 0 {
            warn!(finish_reason = ?response.finish_reason, "Edit response had no image parts");
            return Err(self.report(AppError::NoImageGenerated));
        }

        info!(images = rendered, "Edit complete");
        Ok(rendered)
    }
}
