//! Image Studio
//!
//! A small client for the Gemini image APIs: pick a model, then either
//! generate a batch of images from a fixed prompt or upload an image and
//! describe an edit. Results are handed to a pluggable renderer.

pub mod backend;
pub mod config;
pub mod error;
pub mod response;
pub mod studio;

pub use error::{AppError, Result};
pub use studio::{Mode, ModelId, Studio, UploadedImage};
