//! Conversation Memory
//!
//! Per-user rolling conversation state: recent messages, used-joke history,
//! preferences, and session metadata. This is the only component in the
//! system that retains state across messages.
//!
//! Contexts are created lazily on first write and live until evicted by
//! [`ConversationMemory::evict_idle`]. Nothing is persisted; a restart
//! loses all context.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, Role};

/// Default cap on retained messages per user (oldest evicted first)
pub const DEFAULT_MESSAGE_CAP: usize = 20;

/// Default cap on remembered joke ids per user, so jokes eventually recycle
pub const DEFAULT_JOKE_CAP: usize = 15;

/// Conversational tone hint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Professional,
    #[default]
    Friendly,
}

/// Stored user preferences. Currently only recorded, reserved for
/// personalization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub tone: Tone,
    pub topics: Vec<String>,
}

/// Inferred user mood, derived from recent user messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Frustrated,
    Curious,
    Neutral,
}

/// Derived per-user conversation counters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextStats {
    pub message_count: usize,
    pub session_minutes: i64,
    pub jokes_told: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

/// One user's conversation state
#[derive(Clone, Debug)]
struct ConversationContext {
    messages: VecDeque<ChatMessage>,
    used_jokes: VecDeque<String>,
    preferences: UserPreferences,
    session_start: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl ConversationContext {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: VecDeque::new(),
            used_jokes: VecDeque::new(),
            preferences: UserPreferences::default(),
            session_start: now,
            last_activity: now,
        }
    }
}

// Mood lexicons, checked in priority order. Excited runs first because
// punctuation-heavy excited text often contains question marks that would
// otherwise classify as curious.
const EXCITED_MARKERS: &[&str] = &[
    "!", "awesome", "great", "amazing", "excellent", "love", "perfect",
];
const FRUSTRATED_MARKERS: &[&str] = &[
    "damn", "stupid", "hate", "terrible", "awful", "broken", "bad", "wrong", "error", "fail",
];
const CURIOUS_MARKERS: &[&str] = &[
    "?", "how", "what", "why", "when", "where", "explain", "tell me", "show me", "help",
];

/// Thread-safe, per-user conversation memory store.
///
/// All operations take the user identifier; a user's context is only ever
/// touched by calls carrying that identifier, so a single keyed map with
/// write-locked mutation is sufficient isolation.
pub struct ConversationMemory {
    contexts: RwLock<HashMap<String, ConversationContext>>,
    message_cap: usize,
    joke_cap: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            message_cap: DEFAULT_MESSAGE_CAP,
            joke_cap: DEFAULT_JOKE_CAP,
        }
    }

    /// Override the used-joke cap (tests and tuning)
    pub fn with_joke_cap(mut self, cap: usize) -> Self {
        self.joke_cap = cap;
        self
    }

    /// Record a message for a user, evicting the oldest entry past the cap
    pub fn append(&self, user_id: &str, role: Role, content: impl Into<String>) {
        let mut contexts = self.contexts.write().unwrap();
        let ctx = contexts
            .entry(user_id.to_string())
            .or_insert_with(ConversationContext::new);

        let message = ChatMessage::new(role, content);
        ctx.last_activity = message.timestamp;
        ctx.messages.push_back(message);
        while ctx.messages.len() > self.message_cap {
            ctx.messages.pop_front();
        }
    }

    /// Last `n` messages serialized as `role: content` lines, oldest first.
    /// Empty string when the user has no recorded context.
    pub fn recent_as_text(&self, user_id: &str, n: usize) -> String {
        let contexts = self.contexts.read().unwrap();
        let Some(ctx) = contexts.get(user_id) else {
            return String::new();
        };

        let skip = ctx.messages.len().saturating_sub(n);
        ctx.messages
            .iter()
            .skip(skip)
            .map(ChatMessage::as_context_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Snapshot of the messages a user currently has in memory
    pub fn messages(&self, user_id: &str) -> Vec<ChatMessage> {
        let contexts = self.contexts.read().unwrap();
        contexts
            .get(user_id)
            .map(|ctx| ctx.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remember a joke as told, evicting the oldest id past the cap
    pub fn mark_joke_used(&self, user_id: &str, joke_id: impl Into<String>) {
        let mut contexts = self.contexts.write().unwrap();
        let ctx = contexts
            .entry(user_id.to_string())
            .or_insert_with(ConversationContext::new);

        ctx.used_jokes.push_back(joke_id.into());
        while ctx.used_jokes.len() > self.joke_cap {
            ctx.used_jokes.pop_front();
        }
        ctx.last_activity = Utc::now();
    }

    /// Joke ids already told to this user
    pub fn used_jokes(&self, user_id: &str) -> HashSet<String> {
        let contexts = self.contexts.read().unwrap();
        contexts
            .get(user_id)
            .map(|ctx| ctx.used_jokes.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forget which jokes a user has heard
    pub fn reset_jokes(&self, user_id: &str) {
        let mut contexts = self.contexts.write().unwrap();
        if let Some(ctx) = contexts.get_mut(user_id) {
            ctx.used_jokes.clear();
        }
    }

    /// Infer the user's mood from their last three messages.
    ///
    /// Lexicons are evaluated excited → frustrated → curious, first match
    /// wins; anything else is neutral.
    pub fn infer_mood(&self, user_id: &str) -> Mood {
        let contexts = self.contexts.read().unwrap();
        let Some(ctx) = contexts.get(user_id) else {
            return Mood::Neutral;
        };

        let recent: Vec<String> = ctx
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .rev()
            .take(3)
            .map(|m| m.content.to_lowercase())
            .collect();
        let text = recent.join(" ");

        if EXCITED_MARKERS.iter().any(|m| text.contains(m)) {
            Mood::Excited
        } else if FRUSTRATED_MARKERS.iter().any(|m| text.contains(m)) {
            Mood::Frustrated
        } else if CURIOUS_MARKERS.iter().any(|m| text.contains(m)) {
            Mood::Curious
        } else {
            Mood::Neutral
        }
    }

    /// Derived counters for a user's session
    pub fn stats(&self, user_id: &str) -> ContextStats {
        let contexts = self.contexts.read().unwrap();
        contexts.get(user_id).map_or(
            ContextStats {
                message_count: 0,
                session_minutes: 0,
                jokes_told: 0,
                last_activity: None,
            },
            |ctx| ContextStats {
                message_count: ctx.messages.len(),
                session_minutes: (Utc::now() - ctx.session_start).num_minutes(),
                jokes_told: ctx.used_jokes.len(),
                last_activity: ctx.messages.back().map(|m| m.timestamp),
            },
        )
    }

    /// Store tone/topic hints for a user
    pub fn set_preferences(&self, user_id: &str, preferences: UserPreferences) {
        let mut contexts = self.contexts.write().unwrap();
        let ctx = contexts
            .entry(user_id.to_string())
            .or_insert_with(ConversationContext::new);
        ctx.preferences = preferences;
    }

    /// Stored tone/topic hints for a user
    pub fn preferences(&self, user_id: &str) -> UserPreferences {
        let contexts = self.contexts.read().unwrap();
        contexts
            .get(user_id)
            .map(|ctx| ctx.preferences.clone())
            .unwrap_or_default()
    }

    /// Drop one user's context entirely
    pub fn clear(&self, user_id: &str) {
        let mut contexts = self.contexts.write().unwrap();
        contexts.remove(user_id);
    }

    /// Evict users idle longer than `max_idle`. Returns how many were
    /// removed. The server runs this periodically so a long-lived process
    /// doesn't grow without bound.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut contexts = self.contexts.write().unwrap();
        let before = contexts.len();
        contexts.retain(|_, ctx| ctx.last_activity >= cutoff);
        let evicted = before - contexts.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle conversation contexts");
        }
        evicted
    }

    /// Number of tracked users
    pub fn user_count(&self) -> usize {
        self.contexts.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_cap_preserves_order() {
        let memory = ConversationMemory::new();
        for i in 0..30 {
            memory.append("u1", Role::User, format!("msg {i}"));
        }

        let messages = memory.messages("u1");
        assert_eq!(messages.len(), DEFAULT_MESSAGE_CAP);
        assert_eq!(messages.first().unwrap().content, "msg 10");
        assert_eq!(messages.last().unwrap().content, "msg 29");
    }

    #[test]
    fn test_joke_cap_evicts_oldest() {
        let memory = ConversationMemory::new();
        for i in 0..20 {
            memory.mark_joke_used("u1", format!("joke_{i}"));
        }

        let used = memory.used_jokes("u1");
        assert_eq!(used.len(), DEFAULT_JOKE_CAP);
        assert!(!used.contains("joke_0"));
        assert!(!used.contains("joke_4"));
        assert!(used.contains("joke_5"));
        assert!(used.contains("joke_19"));
    }

    #[test]
    fn test_recent_as_text_oldest_first() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::User, "first");
        memory.append("u1", Role::Assistant, "second");
        memory.append("u1", Role::User, "third");

        let text = memory.recent_as_text("u1", 2);
        assert_eq!(text, "assistant: second\nuser: third");
        assert_eq!(memory.recent_as_text("nobody", 5), "");
    }

    #[test]
    fn test_mood_excited() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::User, "this is amazing!!");
        memory.append("u1", Role::User, "love it");
        assert_eq!(memory.infer_mood("u1"), Mood::Excited);
    }

    #[test]
    fn test_mood_frustrated() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::User, "this is broken, terrible");
        assert_eq!(memory.infer_mood("u1"), Mood::Frustrated);
    }

    #[test]
    fn test_mood_curious() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::User, "how does this work?");
        assert_eq!(memory.infer_mood("u1"), Mood::Curious);
    }

    #[test]
    fn test_mood_neutral() {
        let memory = ConversationMemory::new();
        assert_eq!(memory.infer_mood("u1"), Mood::Neutral);
        memory.append("u1", Role::User, "looking at the charts");
        assert_eq!(memory.infer_mood("u1"), Mood::Neutral);
    }

    #[test]
    fn test_mood_ignores_assistant_messages() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::Assistant, "that's amazing!");
        memory.append("u1", Role::User, "ok");
        assert_eq!(memory.infer_mood("u1"), Mood::Neutral);
    }

    #[test]
    fn test_stats() {
        let memory = ConversationMemory::new();
        memory.append("u1", Role::User, "hi");
        memory.mark_joke_used("u1", "joke_1");

        let stats = memory.stats("u1");
        assert_eq!(stats.message_count, 1);
        assert_eq!(stats.jokes_told, 1);
        assert!(stats.last_activity.is_some());

        let empty = memory.stats("nobody");
        assert_eq!(empty.message_count, 0);
        assert!(empty.last_activity.is_none());
    }

    #[test]
    fn test_evict_idle_removes_only_idle_users() {
        let memory = ConversationMemory::new();
        memory.append("active", Role::User, "hello");

        {
            let mut contexts = memory.contexts.write().unwrap();
            let mut stale = ConversationContext::new();
            stale.last_activity = Utc::now() - Duration::hours(2);
            contexts.insert("idle".into(), stale);
        }

        let evicted = memory.evict_idle(Duration::minutes(30));
        assert_eq!(evicted, 1);
        assert_eq!(memory.user_count(), 1);
        assert!(!memory.messages("active").is_empty());
    }

    #[test]
    fn test_reset_jokes() {
        let memory = ConversationMemory::new();
        memory.mark_joke_used("u1", "joke_1");
        memory.reset_jokes("u1");
        assert!(memory.used_jokes("u1").is_empty());
    }
}
