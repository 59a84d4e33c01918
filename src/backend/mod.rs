pub mod client;
pub mod gemini;
pub mod media;
pub mod usage;
mod utils;

pub use client::{GenerationOptions, LLMClient};
pub use gemini::{GeminiClient, GeminiConfig, Model as GeminiModel};
pub use media::{JPEG_MIME, MediaFile};
pub use usage::{GenerateResult, TokenUsage};
pub(crate) use utils::{check_response_status, handle_http_error};
