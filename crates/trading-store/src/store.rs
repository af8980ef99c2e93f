//! Trading Store Interface
//!
//! Read-side access to the user's sessions and trades. The write path
//! (trade creation) belongs to the application layer, not the assistant.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{PerformanceSummary, Trade, TradeWithSession, TradingSession};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("margin must be positive, got {0}")]
    InvalidMargin(Decimal),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Read operations the assistant needs from the trading data store
#[async_trait]
pub trait TradingStore: Send + Sync {
    /// All sessions for a user, most recent first
    async fn sessions_for_user(&self, user_id: &str) -> Result<Vec<TradingSession>>;

    /// All trades for a user joined with their session names, most recent
    /// first
    async fn trades_for_user(&self, user_id: &str) -> Result<Vec<TradeWithSession>>;

    /// Resolve a session by case-insensitive partial name match, first
    /// match wins (sessions are searched most recent first)
    async fn find_session(&self, user_id: &str, fragment: &str) -> Result<Option<TradingSession>> {
        let fragment = fragment.to_lowercase();
        Ok(self
            .sessions_for_user(user_id)
            .await?
            .into_iter()
            .find(|s| s.name.to_lowercase().contains(&fragment)))
    }

    /// Derived trading counters for prompt context
    async fn performance_summary(&self, user_id: &str) -> Result<PerformanceSummary> {
        let sessions = self.sessions_for_user(user_id).await?;
        let trades = self.trades_for_user(user_id).await?;
        Ok(PerformanceSummary::compute(&sessions, &trades))
    }
}

/// In-memory trading store for development and testing
pub struct MemoryTradingStore {
    sessions: RwLock<Vec<TradingSession>>,
    trades: RwLock<Vec<Trade>>,
}

impl Default for MemoryTradingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTradingStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
            trades: RwLock::new(Vec::new()),
        }
    }

    pub fn add_session(&self, session: TradingSession) {
        self.sessions.write().unwrap().push(session);
    }

    pub fn add_trade(&self, trade: Trade) {
        self.trades.write().unwrap().push(trade);
    }
}

#[async_trait]
impl TradingStore for MemoryTradingStore {
    async fn sessions_for_user(&self, user_id: &str) -> Result<Vec<TradingSession>> {
        let mut sessions: Vec<_> = self
            .sessions
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn trades_for_user(&self, user_id: &str) -> Result<Vec<TradeWithSession>> {
        let sessions: HashMap<_, _> = self
            .sessions
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| (s.id, s.name.clone()))
            .collect();

        let mut trades: Vec<_> = self
            .trades
            .read()
            .unwrap()
            .iter()
            .filter_map(|t| {
                sessions.get(&t.session_id).map(|name| TradeWithSession {
                    trade: t.clone(),
                    session_name: name.clone(),
                })
            })
            .collect();
        trades.sort_by(|a, b| b.trade.created_at.cmp(&a.trade.created_at));
        Ok(trades)
    }
}
