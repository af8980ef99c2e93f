//! Message Enrichment
//!
//! Classify a user message and, when it asks about live data, splice the
//! fetched result into the message as a delimited LIVE DATA block. The
//! completion backend is instructed to weave the block into its reply.
//!
//! Enrichment never fails: when the classification is plain chat or the
//! upstream fetch comes back empty, the original message passes through
//! untouched with `has_live_data = false`.

use crate::classify::{classify, QueryClassification};
use crate::gateway::MarketDataGateway;
use crate::model::MarketDatum;

/// Result of an enrichment attempt
#[derive(Clone, Debug)]
pub struct Enriched {
    /// The prompt to send onward — either the original message or the
    /// original message plus a LIVE DATA block
    pub prompt: String,

    /// Whether live data was attached
    pub has_live_data: bool,
}

impl Enriched {
    fn passthrough(message: &str) -> Self {
        Self {
            prompt: message.to_string(),
            has_live_data: false,
        }
    }

    fn with_block(message: &str, block: &str) -> Self {
        let prompt = format!(
            "{message}\n\n=== LIVE DATA ===\n{block}\n=== END LIVE DATA ===\n\n\
             Use this live data naturally in your reply — analyze it and relate it to trading \
             rather than repeating it verbatim.",
        );
        Self {
            prompt,
            has_live_data: true,
        }
    }
}

impl MarketDataGateway {
    /// Classify `message` and attach live data when applicable
    pub async fn enrich(&self, message: &str) -> Enriched {
        match classify(message) {
            QueryClassification::Crypto { symbol } => {
                match self.fetch_crypto(&symbol).await {
                    Some(price) => {
                        tracing::debug!(%symbol, "enriched message with crypto price");
                        Enriched::with_block(message, &MarketDatum::Crypto(price).format())
                    }
                    None => Enriched::passthrough(message),
                }
            }
            QueryClassification::Stock { symbol } => match self.fetch_stock(&symbol).await {
                Some(quote) => {
                    tracing::debug!(%symbol, "enriched message with stock quote");
                    Enriched::with_block(message, &MarketDatum::Stock(quote).format())
                }
                None => Enriched::passthrough(message),
            },
            QueryClassification::Forex { base, quote } => {
                match self.fetch_forex(&base, &quote).await {
                    Some(rate) => {
                        tracing::debug!(%base, %quote, "enriched message with forex rate");
                        Enriched::with_block(message, &MarketDatum::Forex(rate).format())
                    }
                    None => Enriched::passthrough(message),
                }
            }
            QueryClassification::Search { query } => match self.search(&query).await {
                Some(news) => {
                    tracing::debug!("enriched message with news search results");
                    Enriched::with_block(message, &news.format())
                }
                None => Enriched::passthrough(message),
            },
            QueryClassification::Chat => Enriched::passthrough(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayConfig;
    use axum::{routing::get, Json, Router};

    async fn spawn_crypto_upstream() -> String {
        let app = Router::new().route(
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
    async fn test_enrich_attaches_live_data() {
        let base = spawn_crypto_upstream().await;
        let gateway = gateway_for(&base);

        let enriched = gateway.enrich("What's Bitcoin price today?").await;
        assert!(enriched.has_live_data);
        assert!(enriched.prompt.contains("LIVE DATA"));
        assert!(enriched.prompt.contains("What's Bitcoin price today?"));
        assert!(enriched.prompt.contains("Bitcoin (BTC)"));
    }

    #[tokio::test]
    async fn test_enrich_unreachable_provider_passes_through() {
        let gateway = gateway_for("http://127.0.0.1:9");

        let enriched = gateway.enrich("What's Bitcoin price today?").await;
        assert!(!enriched.has_live_data);
        assert_eq!(enriched.prompt, "What's Bitcoin price today?");
    }

    #[tokio::test]
    async fn test_enrich_chat_passes_through() {
        let gateway = gateway_for("http://127.0.0.1:9");

        let enriched = gateway.enrich("good morning!").await;
        assert!(!enriched.has_live_data);
        assert_eq!(enriched.prompt, "good morning!");
    }
}
