//! Screenshot analysis: one model call, one JSON parse.

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::backend::{GeminiClient, GenerationOptions, LLMClient, MediaFile, TokenUsage};
use crate::error::{ItemLensError, Result};
use crate::model::ItemStats;

/// Sampling temperature for analysis requests. Kept low so the same
/// screenshot yields the same item.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

/// Instructions sent with every screenshot.
///
/// Trade-query rules: status is always `online`; `trade_filters` and
/// `sale_type` are left to the caller.
pub const ITEM_ANALYSIS_PROMPT: &str = r#"
TASK: Analyze the Path of Exile 2 item screenshot.

LEAGUE DETECTION:
1. Only return the league name if found, else leave empty.

ITEM RULES:
- For UNIQUE items: Include "name" and "type".
- For RARE/MAGIC items: Only "type" (base type).

TRADE QUERY GENERATION:
- Return a valid PoE 2 Trade API JSON query in "tradeQuery".
- Ensure status is {"option": "online"}.
- DO NOT add trade_filters or sale_type here; the application handles it.
- Use clean text for filter "id" (e.g., "to maximum life").
- Put numeric values in "value": {"min": X}.

JSON RESPONSE FORMAT:
{
  "name": "Item Name",
  "rarity": "Unique|Rare|Magic|Normal",
  "baseType": "Base Type",
  "league": "",
  "explicitMods": ["text"],
  "tradeQuery": {
    "query": {
      "status": { "option": "online" },
      "type": "BaseName",
      "stats": [{"type": "and", "filters": []}]
    }
  }
}
"#;

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The item exactly as the model described it
    pub data: ItemStats,
    /// Token usage reported by the provider, when it reports any
    pub usage: Option<TokenUsage>,
}

/// Sends item screenshots to a multimodal model and decodes the reply.
///
/// Holds no mutable state; one instance can serve concurrent calls.
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use itemlens::ImageAnalysisClient;
///
/// let analyzer = ImageAnalysisClient::from_env()?;
/// let result = analyzer.analyze("/9j/4AAQSkZJRg...").await?;
/// println!("{} {}", result.data.rarity, result.data.base_type);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageAnalysisClient<C = GeminiClient> {
    client: C,
}

impl ImageAnalysisClient<GeminiClient> {
    /// Analyzer backed by a Gemini client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiClient::from_env()?))
    }
}

impl<C: LLMClient> ImageAnalysisClient<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Analyze a base64-encoded JPEG screenshot.
    ///
    /// The image is sent as-is, without size or format checks. The reply
    /// text is decoded into [`ItemStats`] without any rewriting.
    ///
    /// # Errors
    ///
    /// - whatever the model client returns (transport, auth, quota), unchanged
    /// - [`ItemLensError::EmptyResponse`] when the model returned no text
    /// - [`ItemLensError::ParseError`] when the text is not an item document
    ///
    /// Each failure is logged once at error level before being returned.
    #[instrument(
        name = "analyze_item",
        skip(self, image_base64),
        fields(image_len = image_base64.len())
    )]
    pub async fn analyze(&self, image_base64: &str) -> Result<AnalysisResult> {
        self.analyze_inner(image_base64)
            .await
            .inspect_err(|e| error!(error = %e, "Item analysis failed"))
    }

    /// Analyze raw JPEG bytes.
    pub async fn analyze_bytes(&self, jpeg: &[u8]) -> Result<AnalysisResult> {
        self.analyze(&STANDARD.encode(jpeg)).await
    }

    async fn analyze_inner(&self, image_base64: &str) -> Result<AnalysisResult> {
        info!("Analyzing item screenshot");

        let media = [MediaFile::jpeg(image_base64)];
        let options = GenerationOptions::json(ANALYSIS_TEMPERATURE);
        let reply = self
            .client
            .generate_with_media(ITEM_ANALYSIS_PROMPT, &media, &options)
            .await?;

        if reply.text.is_empty() {
            return Err(ItemLensError::EmptyResponse);
        }
        if reply.finish_reason.as_deref().is_some_and(|r| r != "STOP") {
            warn!(finish_reason = ?reply.finish_reason, "Model stopped early");
        }

        trace!(json = %reply.text, "Parsing model reply");
        let data: ItemStats = serde_json::from_str(&reply.text).map_err(|source| {
            ItemLensError::ParseError {
                source,
                raw: reply.text.clone(),
            }
        })?;

        debug!(
            rarity = %data.rarity,
            base_type = %data.base_type,
            mods = data.explicit_mods.len(),
            "Item analysis complete"
        );
        Ok(AnalysisResult {
            data,
            usage: reply.usage,
        })
    }
}

/// Analyze a screenshot with a Gemini client built from the environment at
/// call time.
///
/// A missing API key is reported like any other analysis failure.
pub async fn analyze_item(image_base64: &str) -> Result<AnalysisResult> {
    let analyzer = ImageAnalysisClient::from_env()
        .inspect_err(|e| error!(error = %e, "Item analysis failed"))?;
    analyzer.analyze(image_base64).await
}
