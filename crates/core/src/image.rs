//! Converts picked image files into self-contained `data:` URLs.

use std::path::Path;

use base64::Engine;

use crate::error::CoreError;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// `data:<mime>;base64,<payload>`.
pub fn to_inline_encoding(bytes: &[u8], mime_type: &str) -> String {
    let mime = mime_type.trim();
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{payload}")
}

/// Guess an image MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => FALLBACK_MIME,
    }
}

/// Read `path` and encode it inline, guessing the MIME type from the extension.
pub async fn read_inline(path: &Path) -> Result<String, CoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_inline_encoding(&bytes, mime_for_path(path)))
}
