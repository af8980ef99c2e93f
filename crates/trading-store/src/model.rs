//! Domain Models
//!
//! Trades, trading sessions, and the derived performance summary the
//! assistant embeds into completion prompts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreError;

/// Side of a recorded position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Long,
    Short,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Long => write!(f, "Long"),
            TradeSide::Short => write!(f, "Short"),
        }
    }
}

/// A single recorded position
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,

    /// Owning session
    pub session_id: Uuid,

    /// Capital committed to the position
    pub margin: Decimal,

    /// Return on investment, percent
    pub roi: Decimal,

    /// Long or Short
    #[serde(rename = "entry_side")]
    pub side: TradeSide,

    /// Realized profit or loss
    pub profit_loss: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade, deriving P/L from margin and ROI.
    ///
    /// Margin must be strictly positive; a zero or negative margin is an
    /// input-validation error, not a NaN waiting to happen.
    pub fn new(
        session_id: Uuid,
        margin: Decimal,
        roi: Decimal,
        side: TradeSide,
    ) -> Result<Self, StoreError> {
        if margin <= Decimal::ZERO {
            return Err(StoreError::InvalidMargin(margin));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            session_id,
            margin,
            roi,
            side,
            profit_loss: margin * roi / Decimal::from(100),
            comments: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Whether the trade closed in profit
    pub fn is_winner(&self) -> bool {
        self.profit_loss > Decimal::ZERO
    }
}

/// A named grouping of trades with starting/current capital
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradingSession {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub initial_capital: Decimal,
    pub current_capital: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradingSession {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, capital: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            initial_capital: capital,
            current_capital: capital,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A trade joined with its session's name, as listed for the assistant
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeWithSession {
    #[serde(flatten)]
    pub trade: Trade,
    pub session_name: String,
}

/// Derived trading counters embedded into completion prompts
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_sessions: usize,
    pub total_trades: usize,
    pub total_profit_loss: Decimal,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: Decimal,
}

impl PerformanceSummary {
    /// Compute the summary from a user's sessions and trades
    pub fn compute(sessions: &[TradingSession], trades: &[TradeWithSession]) -> Self {
        let total_profit_loss: Decimal = trades.iter().map(|t| t.trade.profit_loss).sum();
        let winning_trades = trades.iter().filter(|t| t.trade.is_winner()).count();
        let losing_trades = trades
            .iter()
            .filter(|t| t.trade.profit_loss < Decimal::ZERO)
            .count();
        let win_rate_pct = if trades.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(winning_trades) * Decimal::from(100) / Decimal::from(trades.len())
        };

        Self {
            total_sessions: sessions.len(),
            total_trades: trades.len(),
            total_profit_loss,
            winning_trades,
            losing_trades,
            win_rate_pct,
        }
    }
}
