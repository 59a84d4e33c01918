/// Token usage reported by the model provider for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    /// The model used for this request
    pub model: String,
    /// Number of tokens in the prompt, image included
    pub input_tokens: u64,
    /// Number of tokens in the reply
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of a generate call: the reply text and whatever metadata the
/// provider attached to it.
///
/// `text` is empty when the provider produced no text at all (no candidates,
/// a blocked prompt, or a candidate without text parts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    pub text: String,
    /// Provider-specific stop reason, e.g. `STOP` or `MAX_TOKENS`
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl GenerateResult {
    pub fn new(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage,
        }
    }

    /// A result with just text (no metadata)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}
