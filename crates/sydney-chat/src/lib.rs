//! # sydney-chat
//!
//! Sydney's conversational brain. The [`router::Sydney`] orchestrator is
//! the single entry point for an incoming message: it detects joke and
//! session-switch intents inline, enriches market questions with live
//! data, and falls through to the completion backend with assembled
//! context for everything else.
//!
//! Stateless across messages — all cross-turn state lives in
//! `sydney_core::ConversationMemory`.

pub mod greeting;
pub mod jokes;
pub mod prompt;
pub mod router;

pub use greeting::greeting;
pub use jokes::{JokeCategory, JokeDifficulty, TradingJoke, TRADING_JOKES};
pub use prompt::SYDNEY_SYSTEM_PROMPT;
pub use router::{ChatReply, Sydney};
