use crate::utils::error::{RelayError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read `path` and encode it as a data URL.
pub async fn encode_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RelayError::EncodingError {
            path: path.display().to_string(),
            source,
        })?;
    tracing::debug!("Encoded {} ({} bytes)", path.display(), bytes.len());
    Ok(to_data_url(&mime_for_path(path), &bytes))
}
