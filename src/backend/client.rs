use async_trait::async_trait;

use crate::backend::{GenerateResult, MediaFile};
use crate::error::Result;

/// Sampling and output settings for a single generate call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 to 1.0, lower = more deterministic)
    pub temperature: f32,
    /// Ask the provider to emit this MIME type, e.g. `application/json`
    pub response_mime_type: Option<String>,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Options asking for a JSON reply at the given temperature.
    pub fn json(temperature: f32) -> Self {
        Self {
            temperature,
            response_mime_type: Some("application/json".to_string()),
            max_tokens: None,
        }
    }

    /// Set the maximum tokens to generate
    pub fn max_tokens(mut self, max: u32) -> Self {
        // zero is rejected by the providers
        self.max_tokens = Some(max.max(1));
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            response_mime_type: None,
            max_tokens: None,
        }
    }
}

/// LLMClient is the interface between the item analyzer and a model provider.
///
/// [`GeminiClient`](crate::GeminiClient) is the production implementation.
/// Anything that can turn a prompt plus inline images into text can stand in
/// for it, which is how the analyzer is tested without network access.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use itemlens::{GeminiClient, GenerationOptions, LLMClient, MediaFile};
///
/// let client = GeminiClient::from_env()?;
/// let reply = client
///     .generate_with_media(
///         "What is in this picture? Answer in JSON.",
///         &[MediaFile::jpeg("/9j/4AAQSkZJRg...")],
///         &GenerationOptions::json(0.1),
///     )
///     .await?;
/// println!("{}", reply.text);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate text from a prompt and inline media.
    ///
    /// Media parts are sent before the prompt. Transport, auth and quota
    /// failures are returned as errors; a reply without text is returned as
    /// an empty `text`, not as an error.
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
        options: &GenerationOptions,
    ) -> Result<GenerateResult>;
}
