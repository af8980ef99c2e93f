//! Fixed symbol and alias tables shared by the classifier and the gateway.

/// Ticker → upstream asset id for the crypto price provider
pub const CRYPTO_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("ADA", "cardano"),
    ("DOT", "polkadot"),
    ("LINK", "chainlink"),
    ("XRP", "ripple"),
    ("LTC", "litecoin"),
    ("BCH", "bitcoin-cash"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("MATIC", "matic-network"),
    ("AVAX", "avalanche-2"),
    ("ATOM", "cosmos"),
    ("DOGE", "dogecoin"),
    ("SHIB", "shiba-inu"),
];

/// Resolve a ticker to the upstream asset id, if it is a known crypto
pub fn crypto_id(symbol: &str) -> Option<&'static str> {
    let upper = symbol.to_uppercase();
    CRYPTO_IDS
        .iter()
        .find(|(sym, _)| *sym == upper)
        .map(|(_, id)| *id)
}

/// Whether a ticker is in the known-crypto table
pub fn is_known_crypto(symbol: &str) -> bool {
    crypto_id(symbol).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_id_lookup() {
        assert_eq!(crypto_id("btc"), Some("bitcoin"));
        assert_eq!(crypto_id("AVAX"), Some("avalanche-2"));
        assert_eq!(crypto_id("AAPL"), None);
    }
}
