//! # sydney-runtime
//!
//! Completion providers for the Sydney assistant.
//!
//! ## Providers
//!
//! - **Gemini** (default): hosted generateContent API
//! - **Ollama** (default): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sydney_runtime::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;
//! let completion = provider.complete(system, user, &options).await?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

// Re-export core types for convenience
pub use sydney_core::{
    AssistantError, Completion, CompletionProvider, GenerationOptions, Result,
};
