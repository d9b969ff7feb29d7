//! Common traits and types for image generation backends

use async_trait::async_trait;

use crate::error::Result;
use crate::studio::upload::UploadedImage;

/// Request to edit an uploaded image with a text instruction
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Model identifier
    pub model: String,

    /// Image to edit
    pub image: UploadedImage,

    /// Edit instruction, already trimmed
    pub prompt: String,
}

/// Request to generate a batch of images from a prompt
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier
    pub model: String,

    /// The prompt to generate images from
    pub prompt: String,

    /// Number of images to generate
    pub number_of_images: u32,

    /// Aspect ratio such as "1:1"
    pub aspect_ratio: String,

    /// Person generation policy such as "allow_adult"
    pub person_generation: String,

    /// Media type of the returned images
    pub output_mime_type: String,

    /// Ask the service to report why an image was filtered
    pub include_rai_reason: bool,
}

/// Decoded image payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One part of a mixed text/image response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Image(InlineImage),
    Text(String),
    /// A part that carried neither an image nor text
    Empty,
}

/// Response from an edit call
#[derive(Debug, Clone, Default)]
pub struct EditResponse {
    /// Parts of the first candidate, in response order. Empty when nothing came back.
    pub parts: Vec<ContentPart>,

    /// Why the candidate stopped, if reported
    pub finish_reason: Option<String>,

    /// Why the prompt was blocked, if reported
    pub block_reason: Option<String>,
}

/// One entry of a generate response
#[derive(Debug, Clone, Default)]
pub struct GeneratedImage {
    /// Absent when the entry was filtered
    pub image: Option<InlineImage>,

    /// Safety-filter reason, if the service reported one
    pub rai_filtered_reason: Option<String>,
}

/// Response from a generate call
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Generated entries in service order. `None` when the field was missing.
    pub images: Option<Vec<GeneratedImage>>,
}

/// Trait for image generation backends
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Edit an image according to a prompt
    async fn edit_image(&self, request: EditRequest) -> Result<EditResponse>;

    /// Generate images from a prompt
    async fn generate_images(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
