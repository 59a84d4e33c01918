use thiserror::Error;

/// Error types for the itemlens library.
///
/// Every failure of an item analysis surfaces as one of these variants. The
/// analyzer never retries or recovers; it logs the error once and hands it
/// back to the caller unchanged.
///
/// # Examples
///
/// ```
/// use itemlens::{ItemLensError, Result};
///
/// fn require_text(text: &str) -> Result<&str> {
///     if text.is_empty() {
///         return Err(ItemLensError::EmptyResponse);
///     }
///     Ok(text)
/// }
///
/// match require_text("") {
///     Ok(text) => println!("Got {}", text),
///     Err(ItemLensError::EmptyResponse) => println!("Model said nothing"),
///     Err(e) => println!("Unexpected error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ItemLensError {
    /// The model provider answered with a non-success status
    #[error("API error: {0}")]
    ApiError(String),

    /// Missing or unusable client configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The model returned no text to parse
    #[error("Empty response from AI")]
    EmptyResponse,

    /// The model's text is not a valid item document.
    ///
    /// `raw` holds the reply exactly as received.
    #[error("Failed to parse model response: {source}")]
    ParseError {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider's response envelope could not be decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// HttpError, JsonError and ParseError wrap errors without PartialEq and
// never compare equal.
impl PartialEq for ItemLensError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ApiError(a), Self::ApiError(b)) => a == b,
            (Self::ConfigError(a), Self::ConfigError(b)) => a == b,
            (Self::EmptyResponse, Self::EmptyResponse) => true,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for itemlens operations.
pub type Result<T> = std::result::Result<T, ItemLensError>;
