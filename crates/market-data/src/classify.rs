//! Market/News Query Classifier
//!
//! Pattern-matches free text into a market-data query or plain chat.
//! Evaluation order is fixed and significant:
//!
//! 1. news/informational keywords → `Search` — news intent must pre-empt
//!    asset detection, because news queries frequently name an asset
//!    ("latest on Tesla earnings") yet need a search, not a quote;
//! 2. known asset name/alias → `Crypto`/`Stock`/`Forex`;
//! 3. generic uppercase ticker token (2–6 letters): known crypto first,
//!    six letters read as a forex pair, anything else a stock ticker;
//! 4. otherwise `Chat`.
//!
//! This is a best-effort heuristic. Ambiguous input defaults to `Chat`,
//! which falls through to the general completion backend.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::aliases::is_known_crypto;

/// Classification of a user message, produced fresh per message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryClassification {
    Crypto { symbol: String },
    Stock { symbol: String },
    Forex { base: String, quote: String },
    Search { query: String },
    Chat,
}

// Informational-intent markers. Single words match on word boundaries,
// phrases by substring.
const NEWS_KEYWORDS: &[&str] = &[
    "news",
    "latest",
    "breaking",
    "headline",
    "headlines",
    "fed",
    "inflation",
    "earnings",
    "interest rate",
    "what's happening",
    "what is happening",
    "market today",
];

enum AliasTarget {
    Crypto(&'static str),
    Stock(&'static str),
    Forex(&'static str, &'static str),
}

// Fixed asset-name alias table. Names and tickers both listed so
// "bitcoin price" and "btc price" resolve identically.
const ASSET_ALIASES: &[(&str, AliasTarget)] = &[
    ("bitcoin", AliasTarget::Crypto("BTC")),
    ("btc", AliasTarget::Crypto("BTC")),
    ("ethereum", AliasTarget::Crypto("ETH")),
    ("eth", AliasTarget::Crypto("ETH")),
    ("solana", AliasTarget::Crypto("SOL")),
    ("cardano", AliasTarget::Crypto("ADA")),
    ("dogecoin", AliasTarget::Crypto("DOGE")),
    ("doge", AliasTarget::Crypto("DOGE")),
    ("ripple", AliasTarget::Crypto("XRP")),
    ("xrp", AliasTarget::Crypto("XRP")),
    ("litecoin", AliasTarget::Crypto("LTC")),
    ("apple", AliasTarget::Stock("AAPL")),
    ("aapl", AliasTarget::Stock("AAPL")),
    ("tesla", AliasTarget::Stock("TSLA")),
    ("tsla", AliasTarget::Stock("TSLA")),
    ("microsoft", AliasTarget::Stock("MSFT")),
    ("msft", AliasTarget::Stock("MSFT")),
    ("nvidia", AliasTarget::Stock("NVDA")),
    ("nvda", AliasTarget::Stock("NVDA")),
    ("amazon", AliasTarget::Stock("AMZN")),
    ("amzn", AliasTarget::Stock("AMZN")),
    ("google", AliasTarget::Stock("GOOGL")),
    ("googl", AliasTarget::Stock("GOOGL")),
    ("eurusd", AliasTarget::Forex("EUR", "USD")),
    ("gbpusd", AliasTarget::Forex("GBP", "USD")),
    ("usdjpy", AliasTarget::Forex("USD", "JPY")),
    ("audusd", AliasTarget::Forex("AUD", "USD")),
    ("gold", AliasTarget::Forex("XAU", "USD")),
    ("silver", AliasTarget::Forex("XAG", "USD")),
];

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,6}\b").expect("ticker pattern is valid"));

/// Match `needle` in `haystack` only at word boundaries
fn contains_word(haystack: &str, needle: &str) -> bool {
    // Phrases and punctuation markers fall back to plain substring search
    if !needle.chars().all(char::is_alphanumeric) {
        return haystack.contains(needle);
    }

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let before_ok = abs == 0
            || !haystack[..abs]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let after = abs + needle.len();
        let after_ok = after >= haystack.len()
            || !haystack[after..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return true;
        }
        start = abs + needle.len();
    }
    false
}

/// Classify a free-text user message
pub fn classify(text: &str) -> QueryClassification {
    let lower = text.to_lowercase();

    // 1. News/informational intent wins over asset detection
    if NEWS_KEYWORDS.iter().any(|kw| contains_word(&lower, kw)) {
        return QueryClassification::Search {
            query: text.trim().to_string(),
        };
    }

    // 2. Known asset names and aliases
    for (alias, target) in ASSET_ALIASES {
        if contains_word(&lower, alias) {
            return match target {
                AliasTarget::Crypto(sym) => QueryClassification::Crypto {
                    symbol: (*sym).to_string(),
                },
                AliasTarget::Stock(sym) => QueryClassification::Stock {
                    symbol: (*sym).to_string(),
                },
                AliasTarget::Forex(base, quote) => QueryClassification::Forex {
                    base: (*base).to_string(),
                    quote: (*quote).to_string(),
                },
            };
        }
    }

    // 3. Generic uppercase ticker token
    if let Some(m) = TICKER_RE.find(text) {
        let token = m.as_str();
        if is_known_crypto(token) {
            return QueryClassification::Crypto {
                symbol: token.to_string(),
            };
        }
        if token.len() == 6 {
            return QueryClassification::Forex {
                base: token[..3].to_string(),
                quote: token[3..].to_string(),
            };
        }
        return QueryClassification::Stock {
            symbol: token.to_string(),
        };
    }

    QueryClassification::Chat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_preempts_asset_alias() {
        let result = classify("latest Tesla earnings news");
        assert!(matches!(result, QueryClassification::Search { .. }));
    }

    #[test]
    fn test_crypto_alias() {
        assert_eq!(
            classify("what's the bitcoin price today"),
            QueryClassification::Crypto {
                symbol: "BTC".into()
            }
        );
        assert_eq!(
            classify("how much is eth right now"),
            QueryClassification::Crypto {
                symbol: "ETH".into()
            }
        );
    }

    #[test]
    fn test_stock_alias() {
        assert_eq!(
            classify("tesla stock price"),
            QueryClassification::Stock {
                symbol: "TSLA".into()
            }
        );
    }

    #[test]
    fn test_forex_alias() {
        assert_eq!(
            classify("eurusd rate please"),
            QueryClassification::Forex {
                base: "EUR".into(),
                quote: "USD".into()
            }
        );
        assert_eq!(
            classify("price of gold"),
            QueryClassification::Forex {
                base: "XAU".into(),
                quote: "USD".into()
            }
        );
    }

    #[test]
    fn test_six_letter_token_reads_as_forex_pair() {
        assert_eq!(
            classify("quote for EURJPY"),
            QueryClassification::Forex {
                base: "EUR".into(),
                quote: "JPY".into()
            }
        );
    }

    #[test]
    fn test_known_crypto_ticker_beats_stock_fallback() {
        assert_eq!(
            classify("price of AVAX"),
            QueryClassification::Crypto {
                symbol: "AVAX".into()
            }
        );
    }

    #[test]
    fn test_unknown_ticker_treated_as_stock() {
        assert_eq!(
            classify("quote for NFLX"),
            QueryClassification::Stock {
                symbol: "NFLX".into()
            }
        );
    }

    #[test]
    fn test_plain_chat() {
        assert_eq!(classify("hello, how are you doing"), QueryClassification::Chat);
        assert_eq!(classify("tell me a joke"), QueryClassification::Chat);
    }

    #[test]
    fn test_no_substring_false_positives() {
        // "ada" must not fire inside "nevada"
        assert_eq!(classify("thinking about moving to nevada"), QueryClassification::Chat);
    }
}
