//! Generate request flow: fixed prompt in, a batch of images out

use tracing::{error, info, warn};

use crate::backend::traits::{GenerateRequest, GenerateResponse};
use crate::error::{AppError, Result};
use crate::response::renderer::RenderedImage;
use crate::studio::{Mode, ModelId, Studio};

/// Prompt used for every generate request
pub const GENERATE_PROMPT: &str =
    "A photorealistic close-up of a red fox sitting in fresh snow, soft morning light";

pub const ASPECT_RATIO: &str = "1:1";
pub const PERSON_GENERATION: &str = "allow_adult";
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Alt text for the image at 1-based `position` in a generate response
pub fn generated_alt_text(position: usize) -> String {
    format!("{} - Image {}", GENERATE_PROMPT, position)
}

impl Studio {
    /// Generate images with `model` without changing the selection
    pub async fn generate(&self, model: ModelId) -> Result<usize> {
        let _guard = self.try_begin()?;
        self.run_generate(model).await
    }

    pub(crate) async fn run_generate(&self, model: ModelId) -> Result<usize> {
        if model.mode() != Mode::Generate {
            return Err(self.report(AppError::UnsupportedModel(model.to_string())));
        }

        let count = model.image_count();
        info!(model = %model, n = count, "Generating images");
        self.renderer.begin_loading();

        let request = GenerateRequest {
            model: model.to_string(),
            prompt: GENERATE_PROMPT.to_string(),
            number_of_images: count,
            aspect_ratio: ASPECT_RATIO.to_string(),
            person_generation: PERSON_GENERATION.to_string(),
            output_mime_type: OUTPUT_MIME_TYPE.to_string(),
            include_rai_reason: true,
        };

        let outcome = match self.backend.generate_images(request).await {
            Ok(response) => self.render_generated(response),
            Err(e) => {
                error!(model = %model, error = %e, "Generate request failed");
                Err(self.report(AppError::GenerateFailed))
            }
        };

        self.renderer.end_loading();
        outcome
    }

    fn render_generated(&self, response: GenerateResponse) -> Result<usize> {
        let entries = response.images.unwrap_or_default();

        let mut rendered = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            match entry.image {
                Some(image) => {
                    self.renderer.append_image(RenderedImage {
                        bytes: image.bytes,
                        mime_type: image.mime_type,
                        alt_text: generated_alt_text(index + 1),
                    });
                    rendered += 1;
                }
                None => warn!(
                    position = index + 1,
                    reason = ?entry.rai_filtered_reason,
                    "Generated entry had no image"
                ),
            }
        }

        if rendered == 0 {
            return Err(self.report(AppError::NoImageGenerated));
        }

        info!(images = rendered, "Generation complete");
        Ok(rendered)
    }
}
