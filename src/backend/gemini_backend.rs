//! Gemini API client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::models::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
    OutputOptions, Part, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
};
use crate::backend::traits::{
    ContentPart, EditRequest, EditResponse, GenerateRequest, GenerateResponse, GeneratedImage,
    ImageBackend, InlineImage,
};
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::response::base64;

/// Media type assumed for inline data that does not declare one
const FALLBACK_MIME: &str = "image/png";

/// Backend talking to the Gemini REST API
pub struct GeminiBackend {
    name: String,
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self {
            name: "gemini".to_string(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn decode_inline(inline: InlineData, fallback_mime: &str) -> Result<InlineImage> {
    let mime_type = inline
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback_mime)
        .to_string();

    Ok(InlineImage {
        bytes: base64::decode(&inline.data)?,
        mime_type,
    })
}

fn into_edit_response(response: GenerateContentResponse) -> EditResponse {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return EditResponse {
            block_reason,
            ..Default::default()
        };
    };

    let parts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, part)| match (part.inline_data, part.text) {
            (Some(inline), _) => match decode_inline(inline, FALLBACK_MIME) {
                Ok(image) => ContentPart::Image(image),
                Err(e) => {
                    warn!(part = index, error = %e, "Skipping undecodable image part");
                    ContentPart::Empty
                }
            },
            (None, Some(text)) => ContentPart::Text(text),
            (None, None) => ContentPart::Empty,
        })
        .collect();

    EditResponse {
        parts,
        finish_reason: candidate.finish_reason,
        block_reason,
    }
}

fn into_generate_response(response: PredictResponse, requested_mime: &str) -> GenerateResponse {
    let Some(predictions) = response.predictions else {
        return GenerateResponse { images: None };
    };

    let images = predictions
        .into_iter()
        .enumerate()
        .map(|(index, prediction)| {
            let image = match prediction.bytes_base64_encoded {
                Some(data) if !data.trim().is_empty() => {
                    let inline = InlineData {
                        mime_type: prediction.mime_type,
                        data,
                    };
                    match decode_inline(inline, requested_mime) {
                        Ok(image) => Some(image),
                        Err(e) => {
                            warn!(prediction = index, error = %e, "Skipping undecodable prediction");
                            None
                        }
                    }
                }
                _ => None,
            };

            GeneratedImage {
                image,
                rai_filtered_reason: prediction.rai_filtered_reason,
            }
        })
        .collect();

    GenerateResponse {
        images: Some(images),
    }
}

#[async_trait]
impl ImageBackend for GeminiBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn edit_image(&self, request: EditRequest) -> Result<EditResponse> {
        let url = self.model_url(&request.model, "generateContent");
        debug!(backend = %self.name, model = %request.model, "Sending edit request");

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: Some(request.image.mime_type.clone()),
                            data: base64::encode(&request.image.data),
                        }),
                        ..Default::default()
                    },
                    Part {
                        text: Some(request.prompt),
                        ..Default::default()
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        };

        let response: GenerateContentResponse = self.post(&url, &body).await?;
        debug!(
            backend = %self.name,
            response_id = ?response.response_id,
            model_version = ?response.model_version,
            candidates = response.candidates.len(),
            "Received edit response"
        );

        let response = into_edit_response(response);
        if let Some(reason) = &response.block_reason {
            warn!(backend = %self.name, reason = %reason, "Prompt was blocked");
        }
        Ok(response)
    }

    async fn generate_images(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = self.model_url(&request.model, "predict");
        debug!(
            backend = %self.name,
            model = %request.model,
            n = request.number_of_images,
            "Sending generate request"
        );

        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio,
                person_generation: request.person_generation,
                output_options: OutputOptions {
                    mime_type: request.output_mime_type.clone(),
                },
                include_rai_reason: request.include_rai_reason,
            },
        };

        let response: PredictResponse = self.post(&url, &body).await?;
        Ok(into_generate_response(response, &request.output_mime_type))
    }
}
