//! Common error types for the image studio

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid base64 data: {0}")]
    Decode(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model {0} does not support this request")]
    UnsupportedModel(String),

    #[error("No image uploaded. Please upload an image first.")]
    NoImageUploaded,

    #[error("No prompt provided. Please describe the edit.")]
    NoPromptProvided,

    #[error("No image was generated. The request may have been blocked.")]
    NoImageGenerated,

    #[error("Could not read the uploaded image: {0}")]
    InvalidUpload(String),

    #[error("A request is already in progress")]
    RequestInFlight,

    #[error("Could not edit image. Please try again.")]
    EditFailed,

    #[error("Could not generate images. Please try again.")]
    GenerateFailed,
}

impl AppError {
    /// Whether the error came from local input checks, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::NoImageUploaded | AppError::NoPromptProvided | AppError::UnsupportedModel(_)
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
