//! # trading-store
//!
//! Trade and session domain models plus the `TradingStore` interface the
//! assistant reads its trading data through. The hosted relational store
//! is reached over a PostgREST-style API; an in-memory implementation
//! backs tests and local development.
//!
//! All monetary values use `rust_decimal` — capital, margin, and P/L are
//! money, and money is never an f64.

pub mod model;
pub mod rest;
pub mod store;

pub use model::{PerformanceSummary, Trade, TradeSide, TradeWithSession, TradingSession};
pub use rest::RestTradingStore;
pub use store::{MemoryTradingStore, Result, StoreError, TradingStore};
