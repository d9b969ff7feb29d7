//! Backend module - Traits, wire types, and the Gemini client

pub mod gemini_backend;
pub mod models;
pub mod traits;

pub use gemini_backend::GeminiBackend;
pub use traits::ImageBackend;
