//! Message Router
//!
//! Sydney's top-level entry point. Each incoming message runs one pass:
//!
//! 1. record the user message;
//! 2. joke intent → joke handler;
//! 3. session-switch intent → session handler;
//! 4. otherwise enrich with live market data where applicable, assemble
//!    context (recent memory + trading performance), and call the
//!    completion backend.
//!
//! Backend and store failures stop at this boundary: the user gets a fixed
//! apology, the apology is never written into conversation memory, and the
//! detail goes to the log.

use std::sync::{Arc, LazyLock, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::Serialize;

use market_data::{Enriched, MarketDataGateway};
use sydney_core::{
    AssistantError, CompletionProvider, ConversationMemory, GenerationOptions, Role,
};
use trading_store::TradingStore;

use crate::jokes::{format_joke, infer_category, pick_joke};
use crate::prompt::{build_system_prompt, LiveDataSection};

const JOKE_KEYWORDS: &[&str] = &[
    "tell me a joke",
    "joke",
    "funny",
    "make me laugh",
    "another one",
    "more joke",
    "haha",
    "lol",
];

const FOLLOW_UP_QUESTIONS: &[&str] = &[
    "How's your trading going today? Any interesting setups you're watching? 📈",
    "Seen anything interesting on the charts today? 👀",
    "What's on your watchlist right now? 📋",
];

/// Probability of appending a follow-up question to a joke
const FOLLOW_UP_CHANCE: f64 = 0.4;

static SWITCH_INTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(load\s+.*session|switch\s+to|open\s+.*session|change\s+to\s+.*session)")
        .expect("switch intent pattern is valid")
});

static SWITCH_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:load|switch to|open|change to)\s+(?:the\s+)?(.+?)\s+session")
        .expect("switch name pattern is valid")
});

/// Reply returned to the caller for one message
#[derive(Clone, Debug, Serialize)]
pub struct ChatReply {
    /// Text shown to the user
    pub text: String,

    /// Whether live market/news data was attached to the prompt
    pub live_data: bool,

    /// Session id when the message switched the active session
    pub switched_session: Option<String>,
}

impl ChatReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            live_data: false,
            switched_session: None,
        }
    }
}

/// The message router/orchestrator
pub struct Sydney {
    memory: Arc<ConversationMemory>,
    gateway: Arc<MarketDataGateway>,
    store: Arc<dyn TradingStore>,
    provider: Arc<dyn CompletionProvider>,
    options: GenerationOptions,
    rng: Mutex<StdRng>,
}

impl Sydney {
    pub fn new(
        memory: Arc<ConversationMemory>,
        gateway: Arc<MarketDataGateway>,
        store: Arc<dyn TradingStore>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            memory,
            gateway,
            store,
            provider,
            options: GenerationOptions::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Deterministic randomness for tests
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Handle one user message and produce a reply. Never errors
    /// user-visibly; backend failures degrade to an apology.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> ChatReply {
        let message = message.trim();
        self.memory.append(user_id, Role::User, message);

        let normalized = message.to_lowercase();

        if is_joke_request(&normalized) {
            return self.handle_joke(user_id, &normalized);
        }

        if SWITCH_INTENT_RE.is_match(message) {
            return self.handle_session_switch(user_id, message).await;
        }

        let enriched = self.gateway.enrich(message).await;
        match self.complete_with_context(user_id, message, &enriched).await {
            Ok(text) => {
                self.memory.append(user_id, Role::Assistant, &text);
                ChatReply {
                    text,
                    live_data: enriched.has_live_data,
                    switched_session: None,
                }
            }
            Err(error) => {
                tracing::error!(user_id, %error, "completion pipeline failed");
                // The apology is shown but never fed back into memory, so
                // canned error text can't pollute future completions.
                ChatReply::text_only(error.user_message())
            }
        }
    }

    fn handle_joke(&self, user_id: &str, normalized: &str) -> ChatReply {
        let used = self.memory.used_jokes(user_id);
        let wants_another = normalized.contains("another")
            || normalized.contains("more")
            || normalized.contains("again");
        let previous_turn_was_joke = self.previous_turn_mentioned_joke(user_id);
        let category = infer_category(normalized);

        let (joke, follow_up) = {
            let mut rng = self.rng.lock().unwrap();
            let joke = pick_joke(&mut *rng, &used, Some(category));
            let follow_up = rng.gen_bool(FOLLOW_UP_CHANCE).then(|| {
                FOLLOW_UP_QUESTIONS[rng.gen_range(0..FOLLOW_UP_QUESTIONS.len())]
            });
            (joke, follow_up)
        };

        let Some(joke) = joke else {
            // Unreachable while the catalog is non-empty, but the user
            // still deserves an answer if it ever happens.
            let text = "I'm all out of fresh jokes for now! 😅 But I'd love to help you with your trading analysis instead!";
            self.memory.append(user_id, Role::Assistant, text);
            return ChatReply::text_only(text);
        };

        self.memory.mark_joke_used(user_id, joke.id);

        let mut response = String::new();
        if previous_turn_was_joke {
            if wants_another {
                response.push_str("You're in a good mood! 😄 Here's another one:\n\n");
            } else {
                response.push_str("Glad you enjoyed that! Here's a different one:\n\n");
            }
        }
        response.push_str(&format_joke(joke));
        if let Some(question) = follow_up {
            response.push_str("\n\n");
            response.push_str(question);
        }

        self.memory.append(user_id, Role::Assistant, &response);
        ChatReply::text_only(response)
    }

    /// Whether the exchange before the current message already involved a
    /// joke (the current user message is skipped)
    fn previous_turn_mentioned_joke(&self, user_id: &str) -> bool {
        let messages = self.memory.messages(user_id);
        messages
            .iter()
            .rev()
            .skip(1)
            .take(3)
            .any(|m| m.content.to_lowercase().contains("joke"))
    }

    async fn handle_session_switch(&self, user_id: &str, message: &str) -> ChatReply {
        let Some(name) = SWITCH_NAME_RE
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
        else {
            let text = "I'd be happy to help you switch sessions! Could you tell me which session you'd like to load? For example: \"Load the BTC 5 Minute session\"";
            self.memory.append(user_id, Role::Assistant, text);
            return ChatReply::text_only(text);
        };

        match self.store.find_session(user_id, name).await {
            Ok(Some(session)) => {
                let text = format!(
                    "✅ Switched to \"{}\" session! You can now view and analyze the trades from this session. What would you like to know about it?",
                    session.name
                );
                self.memory.append(user_id, Role::Assistant, &text);
                ChatReply {
                    text,
                    live_data: false,
                    switched_session: Some(session.id.to_string()),
                }
            }
            Ok(None) => {
                let text = format!(
                    "❌ I couldn't find a session named \"{name}\". Here are some tips:\n• Check the spelling\n• Try using part of the session name\n• Ask me to list your sessions first"
                );
                self.memory.append(user_id, Role::Assistant, &text);
                ChatReply::text_only(text)
            }
            Err(error) => {
                tracing::error!(user_id, %error, "session lookup failed");
                ChatReply::text_only(AssistantError::Store(error.to_string()).user_message())
            }
        }
    }

    async fn complete_with_context(
        &self,
        user_id: &str,
        original: &str,
        enriched: &Enriched,
    ) -> Result<String, AssistantError> {
        let recent = self.memory.recent_as_text(user_id, 8);
        let performance = self
            .store
            .performance_summary(user_id)
            .await
            .map_err(|e| AssistantError::Store(e.to_string()))?;

        let live = enriched.has_live_data.then(|| LiveDataSection {
            original_message: original,
            enriched_message: &enriched.prompt,
        });
        let system_prompt = build_system_prompt(&recent, &performance, live.as_ref());

        let completion = self
            .provider
            .complete(&system_prompt, &enriched.prompt, &self.options)
            .await?;

        Ok(completion.content)
    }
}

fn is_joke_request(normalized: &str) -> bool {
    JOKE_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}
