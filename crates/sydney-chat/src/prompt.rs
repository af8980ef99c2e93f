//! Prompt Assembly
//!
//! Builds the system prompt sent to the completion backend: personality,
//! recent conversation context, the user's trading-performance summary,
//! and — when enrichment succeeded — the live-data section.

use chrono::Utc;
use trading_store::PerformanceSummary;

/// Sydney's personality and response guidelines
pub const SYDNEY_SYSTEM_PROMPT: &str = r#"You are Sydney, an AI trading assistant for a trading analytics platform. You are helpful, friendly, conversational, and knowledgeable about trading and markets.

PERSONALITY:
- Be conversational and natural
- Use appropriate emojis to make responses engaging (but not too many)
- Ask follow-up questions to keep conversations flowing
- Remember context from recent messages
- Be encouraging and supportive about the trading journey
- Handle both trading topics AND general conversation
- Be knowledgeable about financial markets, economics, and trading

RESPONSE GUIDELINES:
- Keep responses conversational and engaging
- Use specific data from the trading history when relevant
- Be supportive but honest about trading performance
- Vary your responses - don't be repetitive
- When provided with live market data, analyze it and provide insights
- When provided with news/search results, summarize key points and implications"#;

/// Live-data context attached when enrichment succeeded
#[derive(Clone, Debug)]
pub struct LiveDataSection<'a> {
    /// What the user actually typed
    pub original_message: &'a str,

    /// The message with the LIVE DATA block spliced in
    pub enriched_message: &'a str,
}

/// Assemble the full system prompt for one completion call
pub fn build_system_prompt(
    recent_context: &str,
    performance: &PerformanceSummary,
    live: Option<&LiveDataSection<'_>>,
) -> String {
    let mut prompt = String::from(SYDNEY_SYSTEM_PROMPT);

    prompt.push_str("\n\nCONVERSATION CONTEXT:\n");
    if recent_context.is_empty() {
        prompt.push_str("No previous conversation");
    } else {
        prompt.push_str(recent_context);
    }

    prompt.push_str(&format!(
        "\n\nUSER'S TRADING DATA SUMMARY:\n\
         - Total Sessions: {}\n\
         - Total Trades: {}\n\
         - Total P/L: ${}\n\
         - Win Rate: {:.1}%\n\
         - Winning Trades: {}\n\
         - Losing Trades: {}",
        performance.total_sessions,
        performance.total_trades,
        performance.total_profit_loss.round_dp(2),
        performance.win_rate_pct,
        performance.winning_trades,
        performance.losing_trades,
    ));

    if let Some(live) = live {
        prompt.push_str(&format!(
            "\n\nLIVE DATA INTEGRATION:\n\
             The user's message has been enriched with real-time market data or web search \
             results. This information is current and accurate. Use it naturally in your response.\n\n\
             ORIGINAL USER MESSAGE: \"{}\"\n\
             ENRICHED MESSAGE WITH LIVE DATA: \"{}\"\n\n\
             Incorporate the live data naturally - don't just repeat it; analyze it, provide \
             insights, and relate it to trading.",
            live.original_message, live.enriched_message,
        ));
    }

    prompt.push_str(&format!("\n\nCurrent date: {}", Utc::now().format("%Y-%m-%d")));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_performance_summary() {
        let performance = PerformanceSummary {
            total_sessions: 2,
            total_trades: 5,
            ..Default::default()
        };
        let prompt = build_system_prompt("user: hi", &performance, None);
        assert!(prompt.contains("Total Sessions: 2"));
        assert!(prompt.contains("user: hi"));
        assert!(!prompt.contains("LIVE DATA INTEGRATION"));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_system_prompt("", &PerformanceSummary::default(), None);
        assert!(prompt.contains("No previous conversation"));
    }

    #[test]
    fn test_prompt_with_live_data_section() {
        let live = LiveDataSection {
            original_message: "btc price?",
            enriched_message: "btc price?\n\n=== LIVE DATA ===\n...",
        };
        let prompt = build_system_prompt("", &PerformanceSummary::default(), Some(&live));
        assert!(prompt.contains("LIVE DATA INTEGRATION"));
        assert!(prompt.contains("ORIGINAL USER MESSAGE: \"btc price?\""));
    }
}
