/*!
 * Media
 * Embedding local images as inline data URIs
 */
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported image format")]
    UnsupportedImage,
}

/// Detect the image MIME type from the file signature.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

/// Encode raw image bytes as `data:<mime>;base64,<payload>`.
///
/// There is no size cap; callers decide what they accept.
pub fn image_data_uri(bytes: &[u8]) -> Result<String, MediaError> {
    let mime = sniff_image_mime(bytes).ok_or(MediaError::UnsupportedImage)?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Read a local image file and return it as a data URI.
pub async fn embed_image_file(path: impl AsRef<Path>) -> Result<String, MediaError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let uri = image_data_uri(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        encoded = uri.len(),
        "embedded image as data URI"
    );
    Ok(uri)
}
