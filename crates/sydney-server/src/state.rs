//! Application State

use std::sync::Arc;

use sydney_chat::Sydney;
use sydney_core::{CompletionProvider, ConversationMemory};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The message router/orchestrator
    pub sydney: Arc<Sydney>,

    /// Per-user conversation memory (also reachable through the router;
    /// held here for the stats endpoint and the eviction task)
    pub memory: Arc<ConversationMemory>,

    /// Completion backend, for health reporting
    pub provider: Arc<dyn CompletionProvider>,
}
