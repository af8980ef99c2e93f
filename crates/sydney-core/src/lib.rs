//! # sydney-core
//!
//! Core types for the Sydney trading assistant: conversation memory,
//! the completion-provider abstraction, and the shared error taxonomy.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Sydney (router)                          │
//! │  ┌──────────────────┐  ┌───────────────────────────────┐     │
//! │  │ ConversationMemory│  │  CompletionProvider (Strategy)│     │
//! │  │  (per-user state) │──│  Gemini / Ollama / ...        │     │
//! │  └──────────────────┘  └───────────────────────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `CompletionProvider` trait lets the assistant swap between Gemini,
//! Ollama, or any other text-completion backend without changing routing
//! logic. `ConversationMemory` is the only stateful component in the
//! system; everything else is computed fresh per message.

pub mod error;
pub mod memory;
pub mod message;
pub mod provider;

pub use error::{AssistantError, Result};
pub use memory::{ContextStats, ConversationMemory, Mood, Tone, UserPreferences};
pub use message::{ChatMessage, Role};
pub use provider::{Completion, CompletionProvider, GenerationOptions, TokenUsage};
