//! Validation and inlining of chat image uploads.

use crate::error::ChatError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Every upload is labelled JPEG, whatever its real encoding.
// FIXME(mime): PNG/GIF/WebP uploads are mislabelled; derive the MIME type from
// `image::guess_format` once upstream behavior with correct labels is verified.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// A file received in the `image` form field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Decode `bytes` fully to prove they form a well-formed image.
pub fn verify_image(bytes: &[u8]) -> Result<(), image::ImageError> {
    image::load_from_memory(bytes).map(|_| ())
}

pub fn to_data_url(bytes: &[u8]) -> String {
    format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(bytes))
}

/// Verify the upload and return it as a data URL.
///
/// Decoding runs on the blocking pool.
pub async fn inline_image(upload: ImageUpload) -> Result<String, ChatError> {
    let file_name = upload.file_name.clone();

    let result = tokio::task::spawn_blocking(move || {
        verify_image(&upload.bytes).map(|_| to_data_url(&upload.bytes))
    })
    .await
    .map_err(|e| ChatError::Internal(format!("image verification task failed: {}", e)))?;

    result.map_err(|e| {
        tracing::error!(file_name = %file_name, error = %e, "Invalid image format");
        ChatError::InvalidImage(e.to_string())
    })
}
