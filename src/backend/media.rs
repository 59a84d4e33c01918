use base64::{Engine, engine::general_purpose::STANDARD};

/// MIME type of the screenshots sent for analysis.
pub const JPEG_MIME: &str = "image/jpeg";

/// Inline media sent alongside a prompt.
///
/// `data` is always base64 text in the standard alphabet, which is what the
/// providers expect in an inline part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub data: String,
    pub mime_type: String,
}

impl MediaFile {
    /// Wrap data that is already base64 encoded. The string is sent as-is.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Shorthand for a base64 JPEG screenshot.
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self::from_base64(data, JPEG_MIME)
    }
}
