//! # market-data
//!
//! Live market and news data for the trading assistant.
//!
//! Three concerns live here:
//!
//! - **Classification** — pattern-match free text into a market query
//!   (crypto price, stock quote, forex rate, news search) or plain chat.
//! - **Gateway** — fetch and normalize price/quote/rate/search payloads
//!   from the upstream providers. Upstream failures never surface as
//!   errors; they collapse to `None` and the caller proceeds without
//!   live data.
//! - **Enrichment** — splice a fetched datum into the user's message as a
//!   delimited LIVE DATA block for the completion backend.
//!
//! The classifier is a deliberate keyword heuristic, not NLU; ambiguous
//! input falls through to chat, which is always safe.

pub mod aliases;
pub mod classify;
pub mod enrich;
mod error;
pub mod gateway;
pub mod model;

pub use classify::{classify, QueryClassification};
pub use enrich::Enriched;
pub use error::GatewayError;
pub use gateway::{GatewayConfig, MarketDataGateway};
pub use model::{CryptoPrice, ForexRate, MarketDatum, NewsResult, NewsResults, StockQuote};
