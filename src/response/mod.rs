//! Response handling module - Base64 helpers and result renderers

pub mod base64;
pub mod file;
pub mod renderer;
pub mod state;

pub use file::FileRenderer;
pub use renderer::{RenderedImage, ResultRenderer};
pub use state::{StateRenderer, ViewState};
