//! Market Data Gateway
//!
//! Fetches and normalizes price/quote/rate/search data from the upstream
//! providers. Every operation returns `Option`: a network failure, non-2xx
//! status, malformed payload, or unknown symbol is logged and collapses to
//! `None`, and the caller proceeds without live data. Nothing here ever
//! propagates an error to the user.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::aliases;
use crate::error::GatewayError;
use crate::model::{CryptoPrice, ForexRate, NewsResult, NewsResults, StockQuote};

/// Financial-news domains the search provider is restricted to
const NEWS_DOMAINS: &[&str] = &[
    "bloomberg.com",
    "reuters.com",
    "cnbc.com",
    "marketwatch.com",
    "finance.yahoo.com",
    "coindesk.com",
    "cointelegraph.com",
    "investing.com",
];

const MAX_SEARCH_RESULTS: usize = 5;

/// Gateway configuration. Base URLs are overridable so tests can point at
/// a local fake upstream.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Crypto price provider (CoinGecko-shaped API)
    pub crypto_base_url: String,

    /// Stock/forex quote provider (Alpha-Vantage-shaped API)
    pub quote_base_url: String,

    /// News search provider (Tavily-shaped API)
    pub search_base_url: String,

    /// Quote provider API key
    pub quote_api_key: String,

    /// Search provider API key
    pub search_api_key: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            crypto_base_url: "https://api.coingecko.com/api/v3".into(),
            quote_base_url: "https://www.alphavantage.co/query".into(),
            search_base_url: "https://api.tavily.com".into(),
            quote_api_key: "demo".into(),
            search_api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            crypto_base_url: std::env::var("CRYPTO_API_URL")
                .unwrap_or(defaults.crypto_base_url),
            quote_base_url: std::env::var("QUOTE_API_URL").unwrap_or(defaults.quote_base_url),
            search_base_url: std::env::var("SEARCH_API_URL")
                .unwrap_or(defaults.search_base_url),
            quote_api_key: std::env::var("QUOTE_API_KEY").unwrap_or(defaults.quote_api_key),
            search_api_key: std::env::var("SEARCH_API_KEY").unwrap_or(defaults.search_api_key),
            timeout_secs: defaults.timeout_secs,
        }
    }
}

/// Gateway over the three price providers and the news search provider
pub struct MarketDataGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl Default for MarketDataGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

impl MarketDataGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Current crypto price, or `None` when unavailable
    pub async fn fetch_crypto(&self, symbol: &str) -> Option<CryptoPrice> {
        collapse(self.crypto_inner(symbol).await, "crypto", symbol)
    }

    /// Current stock quote, or `None` when unavailable
    pub async fn fetch_stock(&self, symbol: &str) -> Option<StockQuote> {
        collapse(self.stock_inner(symbol).await, "stock", symbol)
    }

    /// Current forex rate, or `None` when unavailable
    pub async fn fetch_forex(&self, base: &str, quote: &str) -> Option<ForexRate> {
        let pair = format!("{base}/{quote}");
        collapse(self.forex_inner(base, quote).await, "forex", &pair)
    }

    /// Financial-news search, or `None` when unavailable
    pub async fn search(&self, query: &str) -> Option<NewsResults> {
        collapse(self.search_inner(query).await, "search", query)
    }

    async fn crypto_inner(&self, symbol: &str) -> Result<CryptoPrice, GatewayError> {
        // Unknown tickers are still tried lowercased as an asset id; the
        // upstream decides whether it knows them.
        let coin_id = aliases::crypto_id(symbol)
            .map_or_else(|| symbol.to_lowercase(), str::to_string);

        let url = format!("{}/simple/price", self.config.crypto_base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("ids", coin_id.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_last_updated_at", "true"),
            ])
            .timeout(self.timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        let body: HashMap<String, CoinEntry> = response.json().await?;
        let entry = body
            .get(&coin_id)
            .ok_or_else(|| GatewayError::UnknownSymbol(symbol.to_string()))?;

        let change = entry.usd_24h_change.unwrap_or(0.0);
        let updated_at = entry
            .last_updated_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Ok(CryptoPrice {
            symbol: symbol.to_uppercase(),
            name: capitalize(&coin_id),
            price: entry.usd,
            change_24h: change,
            change_pct_24h: change,
            updated_at,
        })
    }

    async fn stock_inner(&self, symbol: &str) -> Result<StockQuote, GatewayError> {
        let response = self
            .http
            .get(&self.config.quote_base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.config.quote_api_key.as_str()),
            ])
            .timeout(self.timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        // A rate-limited or unknown-symbol response is a 200 with an empty
        // (or absent) quote object, so every field stays optional here.
        let body: GlobalQuoteResponse = response.json().await?;
        let quote = body
            .quote
            .ok_or(GatewayError::MissingField("Global Quote"))?;

        let price = parse_field(quote.price, "05. price")?;
        let change = parse_field(quote.change, "09. change")?;
        let change_pct = quote
            .change_percent
            .ok_or(GatewayError::MissingField("10. change percent"))?
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|e| GatewayError::Parse(e.to_string()))?;
        let volume: u64 = quote
            .volume
            .ok_or(GatewayError::MissingField("06. volume"))?
            .parse()
            .map_err(|e: std::num::ParseIntError| GatewayError::Parse(e.to_string()))?;

        Ok(StockQuote {
            symbol: symbol.to_uppercase(),
            price,
            change,
            change_pct,
            volume,
            updated_at: quote
                .latest_trading_day
                .ok_or(GatewayError::MissingField("07. latest trading day"))?,
        })
    }

    async fn forex_inner(&self, base: &str, quote: &str) -> Result<ForexRate, GatewayError> {
        let response = self
            .http
            .get(&self.config.quote_base_url)
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", base),
                ("to_currency", quote),
                ("apikey", self.config.quote_api_key.as_str()),
            ])
            .timeout(self.timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        let body: ExchangeRateResponse = response.json().await?;
        let rate = body
            .rate
            .ok_or(GatewayError::MissingField("Realtime Currency Exchange Rate"))?;

        Ok(ForexRate {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
            rate: parse_field(rate.exchange_rate, "5. Exchange Rate")?,
            updated_at: rate
                .last_refreshed
                .ok_or(GatewayError::MissingField("6. Last Refreshed"))?,
        })
    }

    async fn search_inner(&self, query: &str) -> Result<NewsResults, GatewayError> {
        let url = format!("{}/search", self.config.search_base_url);
        let request = SearchRequest {
            api_key: &self.config.search_api_key,
            query,
            search_depth: "basic",
            include_answer: true,
            max_results: MAX_SEARCH_RESULTS,
            include_domains: NEWS_DOMAINS,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(self.timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        let results = body
            .results
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|r| NewsResult {
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect();

        Ok(NewsResults {
            answer: body.answer,
            results,
        })
    }
}

fn collapse<T>(result: Result<T, GatewayError>, kind: &str, ident: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(kind, ident, %error, "live market data unavailable");
            None
        }
    }
}

fn parse_field(field: Option<String>, name: &'static str) -> Result<f64, GatewayError> {
    field
        .ok_or(GatewayError::MissingField(name))?
        .parse()
        .map_err(|e: std::num::ParseFloatError| GatewayError::Parse(e.to_string()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

// ============================================================================
// Upstream wire shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct CoinEntry {
    usd: f64,
    #[serde(default)]
    usd_24h_change: Option<f64>,
    #[serde(default)]
    last_updated_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<ExchangeRate>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: Option<String>,
    #[serde(rename = "6. Last Refreshed")]
    last_refreshed: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    include_answer: bool,
    max_results: usize,
    include_domains: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchResponseItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseItem {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("bitcoin"), "Bitcoin");
        assert_eq!(capitalize(""), "");
    }

    async fn spawn_fake_upstream() -> String {
        let app = Router::new()
            .route(
                "/simple/price",
                get(|| async {
                    Json(serde_json::json!({
                        "bitcoin": {
                            "usd": 97500.0,
                            "usd_24h_change": 2.5,
                            "last_updated_at": 1_736_950_000
                        }
                    }))
                }),
            )
            .route(
                "/query",
                get(
                    |axum::extract::Query(params): axum::extract::Query<
                        HashMap<String, String>,
                    >| async move {
                        match params.get("function").map(String::as_str) {
                            Some("GLOBAL_QUOTE") if params.get("symbol").is_some_and(|s| s == "AAPL") => {
                                Json(serde_json::json!({
                                    "Global Quote": {
                                        "01. symbol": "AAPL",
                                        "05. price": "242.5000",
                                        "06. volume": "41250000",
                                        "07. latest trading day": "2025-01-15",
                                        "09. change": "3.2500",
                                        "10. change percent": "1.3600%"
                                    }
                                }))
                            }
                            Some("GLOBAL_QUOTE") => {
                                // rate-limited / unknown-symbol placeholder
                                Json(serde_json::json!({ "Global Quote": {} }))
                            }
                            Some("CURRENCY_EXCHANGE_RATE") => Json(serde_json::json!({
                                "Realtime Currency Exchange Rate": {
                                    "5. Exchange Rate": "1.08420000",
                                    "6. Last Refreshed": "2025-01-15 14:30:00"
                                }
                            })),
                            _ => Json(serde_json::json!({})),
                        }
                    },
                ),
            )
            .route(
                "/search",
                post(|| async {
                    Json(serde_json::json!({
                        "answer": "Markets rallied on rate-cut hopes.",
                        "results": [
                            {"title": "Stocks jump", "url": "https://example.com/a", "content": "Broad rally"},
                            {"title": "Bonds steady", "url": "https://example.com/b", "content": "Yields flat"}
                        ]
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn gateway_for(base: &str) -> MarketDataGateway {
        MarketDataGateway::new(GatewayConfig {
            crypto_base_url: base.to_string(),
            quote_base_url: format!("{base}/query"),
            search_base_url: base.to_string(),
            quote_api_key: "test".into(),
            search_api_key: "test".into(),
            timeout_secs: 2,
        })
    }

    #[tokio::test]
    async fn test_fetch_crypto_normalizes_payload() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);

        let price = gateway.fetch_crypto("BTC").await.unwrap();
        assert_eq!(price.symbol, "BTC");
        assert_eq!(price.name, "Bitcoin");
        assert!((price.price - 97500.0).abs() < f64::EPSILON);
        assert!((price.change_pct_24h - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fetch_crypto_unknown_id_is_none() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);
        assert!(gateway.fetch_crypto("NOTREAL").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_stock_quote() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);

        let quote = gateway.fetch_stock("AAPL").await.unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.change_pct - 1.36).abs() < 1e-9);
        assert_eq!(quote.volume, 41_250_000);
    }

    #[tokio::test]
    async fn test_fetch_stock_empty_quote_is_none() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);
        assert!(gateway.fetch_stock("ZZZZ").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_forex_rate() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);

        let rate = gateway.fetch_forex("EUR", "USD").await.unwrap();
        assert_eq!(rate.base, "EUR");
        assert!((rate.rate - 1.0842).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_search_caps_results() {
        let base = spawn_fake_upstream().await;
        let gateway = gateway_for(&base);

        let news = gateway.search("fed rate decision").await.unwrap();
        assert!(news.answer.is_some());
        assert_eq!(news.results.len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_none() {
        // Nothing listens on this port
        let gateway = gateway_for("http://127.0.0.1:9");
        assert!(gateway.fetch_crypto("BTC").await.is_none());
        assert!(gateway.fetch_stock("AAPL").await.is_none());
        assert!(gateway.search("news").await.is_none());
    }
}
