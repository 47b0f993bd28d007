//! Inline image payloads (`data:image/<ext>;base64,<payload>`).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::ApiError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "gif", "webp"];

/// Decoded image bytes and the file extension taken from the MIME subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub ext: String,
}

/// Decode a base64 image data URI. Any malformation is a validation error
/// on the `image` field.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, ApiError> {
    let invalid = |message: &str| ApiError::validation("image", message);

    let rest = uri
        .strip_prefix("data:image/")
        .ok_or_else(|| invalid("image must be a data:image/... URI"))?;
    let (ext, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| invalid("image must be base64 encoded"))?;

    let ext = ext.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(invalid("unsupported image type"));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid("image payload is not valid base64"))?;
    if bytes.is_empty() {
        return Err(invalid("image payload is empty"));
    }

    Ok(DecodedImage { bytes, ext })
}
