//! Base64 encoding and decoding utilities

use base64::{engine::general_purpose::STANDARD, Engine};
use crate::error::{AppError, Result};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode base64 string to binary data
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    // Handle data URL format (e.g., "data:image/png;base64,...")
    let data = match encoded.split_once(',') {
        Some((_, payload)) => payload,
        None => encoded,
    };

    STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// Get the media type from a base64 data URL prefix
pub fn get_mime_from_data_url(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:")?;
    let end = rest.find(";base64,")?;
    let mime = &rest[..end];
    (!mime.is_empty()).then_some(mime)
}

/// Split a data URL into its media type and decoded bytes
pub fn parse_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let mime = get_mime_from_data_url(data_url)
        .ok_or_else(|| AppError::Decode("not a base64 data URL".to_string()))?;
    Ok((mime.to_string(), decode(data_url)?))
}
