//! Hosted Store Client
//!
//! Speaks the PostgREST-style API of the hosted relational store. Only the
//! read side lives here; the application layer owns trade creation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{Trade, TradeWithSession, TradingSession};
use crate::store::{Result, StoreError, TradingStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the hosted store
#[derive(Clone, Debug)]
pub struct RestStoreConfig {
    /// Store base URL (e.g. `https://xyz.supabase.co`)
    pub base_url: String,

    /// Service key sent as both `apikey` and bearer token
    pub service_key: String,
}

impl RestStoreConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| StoreError::Config("SUPABASE_URL not set".into()))?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| StoreError::Config("SUPABASE_SERVICE_ROLE_KEY not set".into()))?;
        Ok(Self {
            base_url,
            service_key,
        })
    }
}

/// PostgREST-style trading store client
pub struct RestTradingStore {
    http: reqwest::Client,
    config: RestStoreConfig,
}

impl RestTradingStore {
    pub fn new(config: RestStoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(RestStoreConfig::from_env()?))
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/rest/v1/{path}", self.config.base_url))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .timeout(REQUEST_TIMEOUT)
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.request(path).query(query).send().await?;
        if !response.status().is_success() {
            tracing::warn!(path, status = %response.status(), "trading store request failed");
            return Err(StoreError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Trade row with its embedded session name, as the store returns it
#[derive(Debug, Deserialize)]
struct TradeRow {
    #[serde(flatten)]
    trade: Trade,
    trading_sessions: EmbeddedSession,
}

#[derive(Debug, Deserialize)]
struct EmbeddedSession {
    name: String,
}

#[async_trait]
impl TradingStore for RestTradingStore {
    async fn sessions_for_user(&self, user_id: &str) -> Result<Vec<TradingSession>> {
        let filter = format!("eq.{user_id}");
        self.fetch(
            "trading_sessions",
            &[
                ("user_id", filter.as_str()),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    async fn trades_for_user(&self, user_id: &str) -> Result<Vec<TradeWithSession>> {
        let filter = format!("eq.{user_id}");
        let rows: Vec<TradeRow> = self
            .fetch(
                "trades",
                &[
                    ("select", "*,trading_sessions!inner(name,user_id)"),
                    ("trading_sessions.user_id", filter.as_str()),
                    ("order", "created_at.desc"),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TradeWithSession {
                trade: row.trade,
                session_name: row.trading_sessions.name,
            })
            .collect())
    }

    async fn find_session(&self, user_id: &str, fragment: &str) -> Result<Option<TradingSession>> {
        let user_filter = format!("eq.{user_id}");
        let name_filter = format!("ilike.*{fragment}*");
        let mut sessions: Vec<TradingSession> = self
            .fetch(
                "trading_sessions",
                &[
                    ("user_id", user_filter.as_str()),
                    ("name", name_filter.as_str()),
                    ("order", "created_at.desc"),
                ],
            )
            .await?;

        if sessions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(sessions.remove(0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_row_deserializes_embedded_session() {
        let json = serde_json::json!({
            "id": "7f9c0f1e-8a4b-4f6e-9a9e-1c2d3e4f5a6b",
            "session_id": "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0",
            "margin": "500",
            "roi": "12",
            "entry_side": "Long",
            "profit_loss": "60",
            "created_at": "2025-01-15T14:30:00Z",
            "trading_sessions": {"name": "BTC 5 Minute"}
        });

        let row: TradeRow = serde_json::from_value(json).unwrap();
        assert_eq!(row.trading_sessions.name, "BTC 5 Minute");
        assert_eq!(row.trade.profit_loss.to_string(), "60");
    }
}
