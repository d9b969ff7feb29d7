//! Model catalog and the edit/generate mode it implies

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Behavioral class selected by the model choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Single image editing with an uploaded image and a prompt
    Edit,
    /// Batch generation from the fixed prompt
    Generate,
}

/// The selectable models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    GeminiFlashImage,
    Imagen4,
    Imagen4Ultra,
    Imagen4Fast,
    Imagen3,
}

impl ModelId {
    /// Catalog in display order. The first entry is selected at startup.
    pub const ALL: [ModelId; 5] = [
        ModelId::GeminiFlashImage,
        ModelId::Imagen4,
        ModelId::Imagen4Ultra,
        ModelId::Imagen4Fast,
        ModelId::Imagen3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::GeminiFlashImage => "gemini-2.5-flash-image-preview",
            ModelId::Imagen4 => "imagen-4.0-generate-001",
            ModelId::Imagen4Ultra => "imagen-4.0-ultra-generate-001",
            ModelId::Imagen4Fast => "imagen-4.0-fast-generate-001",
            ModelId::Imagen3 => "imagen-3.0-generate-002",
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ModelId::GeminiFlashImage => Mode::Edit,
            _ => Mode::Generate,
        }
    }

    /// Images requested per generate call. The ultra model only accepts one.
    pub fn image_count(&self) -> u32 {
        match self {
            ModelId::Imagen4Ultra => 1,
            _ => 3,
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("models/").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| AppError::UnknownModel(s.to_string()))
    }
}
