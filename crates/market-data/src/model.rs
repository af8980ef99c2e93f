//! Normalized Market Data
//!
//! Heterogeneous upstream payloads are adapted into these shapes before
//! being formatted into natural-language text. Prices here are display
//! values straight from upstream JSON floats — no money arithmetic happens
//! on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized crypto price
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CryptoPrice {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change_24h: f64,
    pub change_pct_24h: f64,
    pub updated_at: DateTime<Utc>,
}

/// Normalized stock quote
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub volume: u64,
    /// Latest trading day as reported by upstream (date string)
    pub updated_at: String,
}

/// Normalized forex rate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForexRate {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    /// Last refresh as reported by upstream
    pub updated_at: String,
}

/// Any normalized price datum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarketDatum {
    Crypto(CryptoPrice),
    Stock(StockQuote),
    Forex(ForexRate),
}

/// One supporting search result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Extractive answer plus supporting results from the news search provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsResults {
    pub answer: Option<String>,
    pub results: Vec<NewsResult>,
}

/// Group an integer's digits with thousands separators
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a USD amount with grouped digits and two decimals
fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}.{:02}", group_thousands(cents / 100), cents % 100)
}

impl MarketDatum {
    /// Render a datum as a short human-readable block with a directional
    /// indicator and a recency timestamp. Pure function: same datum in,
    /// same text out.
    pub fn format(&self) -> String {
        match self {
            MarketDatum::Crypto(c) => {
                let arrow = if c.change_pct_24h >= 0.0 { "📈" } else { "📉" };
                let sign = if c.change_pct_24h >= 0.0 { "+" } else { "" };
                format!(
                    "🔸 {} ({}): ${}\n{arrow} 24h Change: {sign}{:.2}% ({sign}${:.2})\n⏰ Updated: {}",
                    c.name,
                    c.symbol,
                    format_usd(c.price),
                    c.change_pct_24h,
                    c.change_24h,
                    c.updated_at.format("%H:%M:%S UTC"),
                )
            }
            MarketDatum::Stock(s) => {
                let arrow = if s.change_pct >= 0.0 { "📈" } else { "📉" };
                let sign = if s.change_pct >= 0.0 { "+" } else { "" };
                format!(
                    "📊 {}: ${}\n{arrow} Change: {sign}{:.2}% ({sign}${:.2})\n📦 Volume: {}\n⏰ Updated: {}",
                    s.symbol,
                    format_usd(s.price),
                    s.change_pct,
                    s.change,
                    group_thousands(s.volume),
                    s.updated_at,
                )
            }
            MarketDatum::Forex(f) => format!(
                "💱 {}/{}: {:.4}\n⏰ Updated: {}",
                f.base, f.quote, f.rate, f.updated_at,
            ),
        }
    }
}

impl NewsResults {
    /// Render the answer and supporting results as a digest block
    pub fn format(&self) -> String {
        let mut out = String::new();
        if let Some(answer) = &self.answer {
            out.push_str(answer);
        }
        for result in &self.results {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("• {} — {} ({})", result.title, result.snippet, result.url));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_crypto() -> MarketDatum {
        MarketDatum::Crypto(CryptoPrice {
            symbol: "BTC".into(),
            name: "Bitcoin".into(),
            price: 97500.0,
            change_24h: 2340.5,
            change_pct_24h: 2.46,
            updated_at: Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap(),
        })
    }

    #[test]
    fn test_format_is_idempotent() {
        let datum = sample_crypto();
        assert_eq!(datum.format(), datum.format());
    }

    #[test]
    fn test_format_crypto_direction_up() {
        let text = sample_crypto().format();
        assert!(text.contains("📈"));
        assert!(text.contains("+2.46%"));
        assert!(text.contains("$97,500.00"));
    }

    #[test]
    fn test_format_stock_direction_down() {
        let datum = MarketDatum::Stock(StockQuote {
            symbol: "TSLA".into(),
            price: 242.5,
            change: -5.25,
            change_pct: -2.12,
            volume: 101_234_567,
            updated_at: "2025-01-15".into(),
        });
        let text = datum.format();
        assert!(text.contains("📉"));
        assert!(text.contains("-2.12%"));
        assert!(text.contains("101,234,567"));
    }

    #[test]
    fn test_format_forex() {
        let datum = MarketDatum::Forex(ForexRate {
            base: "EUR".into(),
            quote: "USD".into(),
            rate: 1.0842,
            updated_at: "2025-01-15 14:30:00".into(),
        });
        assert!(datum.format().contains("EUR/USD: 1.0842"));
    }

    #[test]
    fn test_news_digest() {
        let news = NewsResults {
            answer: Some("Markets rallied.".into()),
            results: vec![NewsResult {
                title: "Stocks jump".into(),
                url: "https://example.com/a".into(),
                snippet: "Broad rally".into(),
            }],
        };
        let text = news.format();
        assert!(text.starts_with("Markets rallied."));
        assert!(text.contains("• Stocks jump"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(25_000_000_000), "25,000,000,000");
    }
}
