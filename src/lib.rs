//! itemlens: read Path of Exile 2 items from screenshots
//!
//! # Overview
//!
//! itemlens sends an item screenshot to a multimodal model (Google Gemini),
//! asks for a fixed JSON description of the item, and decodes the reply into
//! strongly-typed Rust values, including a trade-site search query built
//! from the item's modifiers.
//!
//! Key features:
//! - One call per screenshot: image + fixed prompt in, [`ItemStats`] out
//! - Typed trade query that round-trips unknown keys, so callers can add
//!   their own trade filters before searching
//! - Pluggable model backend through the [`LLMClient`] trait
//! - `tracing` instrumentation, with an optional subscriber setup helper
//!
//! # Quick Start
//!
//! ```no_run
//! use itemlens::analyze_item;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads API_KEY (or GEMINI_API_KEY) from the environment
//!     let screenshot_base64 = std::fs::read_to_string("item.jpg.b64")?;
//!     let result = analyze_item(screenshot_base64.trim()).await?;
//!
//!     println!("Rarity: {}", result.data.rarity);
//!     println!("Base: {}", result.data.base_type);
//!     println!("Query: {}", serde_json::to_string(&result.data.trade_query)?);
//!
//!     Ok(())
//! }
//! ```

mod analysis;
mod backend;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod model;

// Re-exports for convenience
pub use analysis::{
    ANALYSIS_TEMPERATURE, AnalysisResult, ITEM_ANALYSIS_PROMPT, ImageAnalysisClient, analyze_item,
};
pub use backend::gemini::API_KEY_ENV_VARS;
pub use backend::{
    GeminiClient, GeminiConfig, GeminiModel, GenerateResult, GenerationOptions, JPEG_MIME,
    LLMClient, MediaFile, TokenUsage,
};
pub use error::{ItemLensError, Result};
pub use model::{
    ItemRarity, ItemStats, StatFilter, StatGroup, StatValue, TradeQuery, TradeSearch, TradeStatus,
};
