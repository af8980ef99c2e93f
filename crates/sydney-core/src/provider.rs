//! Completion Provider Strategy
//!
//! Common interface for text-completion backends (Gemini, Ollama, ...).
//! The router works exclusively through this trait, so backends can be
//! swapped without touching routing logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a completion request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-1.5-flash", "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 {
    0.8
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from a completion backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if the backend reports them)
    pub usage: Option<TokenUsage>,
}

/// Strategy trait for completion backends.
///
/// The system prompt carries personality, conversation context, trading
/// data, and any live-data block; the user prompt is the (possibly
/// enriched) message text. Returns free text, no structured output.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Backend name, for logging
    fn name(&self) -> &str;

    /// Check if the backend is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.8);
        assert_eq!(opts.max_tokens, 1000);
        assert_eq!(opts.model, "gemini-1.5-flash");
    }
}
