use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

use crate::backend::{
    GenerateResult, GenerationOptions, LLMClient, MediaFile, TokenUsage, check_response_status,
    handle_http_error,
};
use crate::error::{ItemLensError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Gemini models that accept image input
///
/// For the current list see the
/// [Google AI Models Documentation](https://ai.google.dev/models).
///
/// Any other model name can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use itemlens::GeminiModel;
/// use std::str::FromStr;
///
/// let model = GeminiModel::Custom("gemini-custom".to_string());
/// let model = GeminiModel::from_str("gemini-custom").unwrap();
/// let model = GeminiModel::from_string("gemini-custom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash (default, best price/performance)
    #[default]
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Gemini 2.0 Flash Lite
    Gemini20FlashLite,
    /// Gemini Flash Latest (alias for latest Flash model)
    GeminiFlashLatest,
    /// Custom model name (for new models or Gemini-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashLite => "gemini-2.0-flash-lite",
            Model::GeminiFlashLatest => "gemini-flash-latest",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Unknown names become `Custom(name)`.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-2.0-flash-lite" => Model::Gemini20FlashLite,
            "gemini-flash-latest" => Model::GeminiFlashLatest,
            _ => Model::Custom(name),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the Gemini client
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: Model,
    pub timeout: Option<Duration>,
    /// Custom base URL for Gemini-compatible APIs.
    /// Defaults to "https://generativelanguage.googleapis.com/v1beta" if not set
    pub base_url: Option<String>,
}

impl GeminiConfig {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: Model::default(),
            timeout: None,
            base_url: None,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini client for multimodal `generateContent` calls
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

// Gemini API request and response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(Blob),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn build_request(
    prompt: &str,
    media: &[MediaFile],
    options: &GenerationOptions,
) -> GenerateContentRequest {
    let mut parts: Vec<Part> = media
        .iter()
        .map(|m| {
            Part::InlineData(Blob {
                mime_type: m.mime_type.clone(),
                data: m.data.clone(),
            })
        })
        .collect();
    parts.push(Part::Text(prompt.to_string()));

    GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            temperature: options.temperature,
            max_output_tokens: options.max_tokens,
            response_mime_type: options.response_mime_type.clone(),
        },
    }
}

/// Collapse a response into text the way the official SDKs do: all non-thought
/// text parts of the first candidate, concatenated. Missing text is "".
fn completion_to_result(completion: GenerateContentResponse, model: &Model) -> GenerateResult {
    if let Some(reason) = completion
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!(block_reason = reason, "Gemini blocked the prompt");
    }

    let model_name = completion
        .model_version
        .unwrap_or_else(|| model.as_str().to_string());
    let usage = completion.usage_metadata.map(|u| {
        TokenUsage::new(
            model_name,
            u.prompt_token_count,
            u.candidates_token_count,
        )
    });

    let Some(candidate) = completion.candidates.into_iter().next() else {
        warn!("Gemini API returned no candidates");
        return GenerateResult::new("", usage);
    };
    trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought.unwrap_or(false))
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    debug!(content_len = text.len(), "Extracted text from Gemini response");

    GenerateResult {
        text,
        finish_reason: candidate.finish_reason,
        usage,
    }
}

fn api_key_from<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(*name).filter(|value| !value.is_empty()))
        .ok_or_else(|| {
            ItemLensError::ConfigError(format!(
                "no Gemini API key found; set one of {}",
                API_KEY_ENV_VARS.join(", ")
            ))
        })
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key.
    ///
    /// ```no_run
    /// # use itemlens::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-gemini-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ItemLensError::ConfigError(
                "API key cannot be empty. Use GeminiClient::from_env() to read it from API_KEY or GEMINI_API_KEY.".to_string(),
            ));
        }

        let config = GeminiConfig::new(api_key);
        info!(model = %config.model, "Created Gemini client");

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create a new Gemini client reading the API key from `API_KEY`, or
    /// `GEMINI_API_KEY` when `API_KEY` is unset or empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither variable holds a key.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from(|name| std::env::var(name).ok())?;
        let config = GeminiConfig::new(api_key);
        info!(model = %config.model, "Created Gemini client from environment variable");

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Set the model to use
    #[instrument(skip_all)]
    pub fn model(mut self, model: impl Into<Model>) -> Self {
        let model = model.into();
        debug!(previous_model = ?self.config.model, new_model = ?model, "Setting Gemini model");
        self.config.model = model;
        self
    }

    /// Set the timeout for HTTP requests.
    ///
    /// Applies to each request as a whole, connection included.
    #[instrument(skip(self))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        debug!(previous_timeout = ?self.config.timeout, new_timeout = ?timeout, "Setting timeout");
        self.config.timeout = Some(timeout);

        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    error = %e,
                    "Failed to build reqwest client with timeout, using default"
                );
                reqwest::Client::new()
            });

        self
    }

    /// Set a custom base URL for Gemini-compatible APIs.
    ///
    /// * `base_url` - e.g. "http://localhost:1234/v1beta"; a trailing slash is ignored
    #[instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug!(
            previous_base_url = ?self.config.base_url,
            new_base_url = %base_url,
            "Setting custom base URL"
        );
        self.config.base_url = Some(base_url);
        self
    }

    fn endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{}/models/{}:generateContent",
            base_url,
            self.config.model.as_str()
        )
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    #[instrument(
        name = "gemini_generate_with_media",
        skip(self, prompt, media, options),
        fields(
            model = %self.config.model.as_str(),
            prompt_len = prompt.len(),
            media_count = media.len()
        )
    )]
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
        options: &GenerationOptions,
    ) -> Result<GenerateResult> {
        let request = build_request(prompt, media, options);
        let url = self.endpoint();
        debug!(
            url = %url,
            temperature = options.temperature,
            response_mime_type = ?options.response_mime_type,
            "Sending request to Gemini API"
        );

        // The key goes in a header so it never shows up in URLs inside
        // reqwest errors or logs.
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;
        let body = response
            .text()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;
        trace!(body = %body, "Raw Gemini response");

        let completion: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to decode Gemini response envelope");
            e
        })?;

        Ok(completion_to_result(completion, &self.config.model))
    }
}
