//! Joke Catalog & Selector
//!
//! A fixed, hand-authored corpus of trading jokes. Selection avoids
//! repeats against the caller's used-joke set, falling back to the full
//! catalog on exhaustion — the user always gets a joke if one exists at
//! all, trading repeat risk against hard failure.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JokeCategory {
    Trading,
    Market,
    Crypto,
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JokeDifficulty {
    Easy,
    Medium,
    Advanced,
}

/// An immutable catalog entry
#[derive(Clone, Debug, Serialize)]
pub struct TradingJoke {
    pub id: &'static str,
    pub setup: &'static str,
    pub punchline: &'static str,
    pub category: JokeCategory,
    pub difficulty: JokeDifficulty,
}

pub const TRADING_JOKES: &[TradingJoke] = &[
    TradingJoke {
        id: "joke_1",
        setup: "Why don't traders ever get lost?",
        punchline: "Because they always know where the market is heading! 📈",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Easy,
    },
    TradingJoke {
        id: "joke_2",
        setup: "What's a trader's favorite music?",
        punchline: "Bull market jazz! 🎵",
        category: JokeCategory::Market,
        difficulty: JokeDifficulty::Easy,
    },
    TradingJoke {
        id: "joke_3",
        setup: "Why did the day trader break up with their girlfriend?",
        punchline: "She had too much volatility and not enough support! 💔",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Medium,
    },
    TradingJoke {
        id: "joke_4",
        setup: "What do you call a crypto investor who's always calm?",
        punchline: "A HODLer with diamond hands! 💎🙌",
        category: JokeCategory::Crypto,
        difficulty: JokeDifficulty::Easy,
    },
    TradingJoke {
        id: "joke_5",
        setup: "Why don't bears ever win at poker?",
        punchline: "Because they always fold! 🐻",
        category: JokeCategory::Market,
        difficulty: JokeDifficulty::Easy,
    },
    TradingJoke {
        id: "joke_6",
        setup: "What's the difference between a trader and a pizza?",
        punchline: "A pizza can feed a family of four! 🍕",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Medium,
    },
    TradingJoke {
        id: "joke_7",
        setup: "Why did the algorithm go to therapy?",
        punchline: "It had too many emotional stops! 🤖",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Advanced,
    },
    TradingJoke {
        id: "joke_8",
        setup: "What's a swing trader's favorite dance?",
        punchline: "The market swing! 💃",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Easy,
    },
    TradingJoke {
        id: "joke_9",
        setup: "Why don't scalpers ever get speeding tickets?",
        punchline: "They're always in and out too fast! ⚡",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Medium,
    },
    TradingJoke {
        id: "joke_10",
        setup: "What did the candlestick say to the moving average?",
        punchline: "Stop following me around! 🕯️",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Advanced,
    },
    TradingJoke {
        id: "joke_11",
        setup: "Why did the forex trader go to the doctor?",
        punchline: "They had a bad case of currency fever! 🌡️",
        category: JokeCategory::Trading,
        difficulty: JokeDifficulty::Medium,
    },
    TradingJoke {
        id: "joke_12",
        setup: "What's a bear market's favorite season?",
        punchline: "Fall! 🍂",
        category: JokeCategory::Market,
        difficulty: JokeDifficulty::Easy,
    },
];

/// Pick a joke the user hasn't heard, uniformly at random.
///
/// Exhausted exclusions fall back to the category's full set, and a
/// category with no entries at all falls back to the whole catalog.
/// The caller records the returned id into the user's used-joke history.
pub fn pick_joke<R: Rng>(
    rng: &mut R,
    exclude: &HashSet<String>,
    category: Option<JokeCategory>,
) -> Option<&'static TradingJoke> {
    let in_category =
        |joke: &&'static TradingJoke| category.is_none_or(|c| joke.category == c);

    let mut pool: Vec<&'static TradingJoke> = TRADING_JOKES
        .iter()
        .filter(|j| !exclude.contains(j.id))
        .filter(in_category)
        .collect();

    if pool.is_empty() {
        pool = TRADING_JOKES.iter().filter(in_category).collect();
    }
    if pool.is_empty() {
        pool = TRADING_JOKES.iter().collect();
    }

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Pick by difficulty, strictly: `None` once that difficulty is exhausted
pub fn pick_by_difficulty<R: Rng>(
    rng: &mut R,
    difficulty: JokeDifficulty,
    exclude: &HashSet<String>,
) -> Option<&'static TradingJoke> {
    let pool: Vec<&'static TradingJoke> = TRADING_JOKES
        .iter()
        .filter(|j| j.difficulty == difficulty && !exclude.contains(j.id))
        .collect();

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Infer the joke category a message is asking for
pub fn infer_category(normalized_message: &str) -> JokeCategory {
    if normalized_message.contains("crypto") || normalized_message.contains("bitcoin") {
        JokeCategory::Crypto
    } else if normalized_message.contains("market")
        || normalized_message.contains("bull")
        || normalized_message.contains("bear")
    {
        JokeCategory::Market
    } else {
        JokeCategory::Trading
    }
}

/// A joke renders as setup, blank line, punchline
pub fn format_joke(joke: &TradingJoke) -> String {
    format!("{}\n\n{}", joke.setup, joke.punchline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_respects_exclusions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut exclude = HashSet::new();

        // Draw every trading joke exactly once
        let trading_count = TRADING_JOKES
            .iter()
            .filter(|j| j.category == JokeCategory::Trading)
            .count();
        for _ in 0..trading_count {
            let joke = pick_joke(&mut rng, &exclude, Some(JokeCategory::Trading)).unwrap();
            assert!(!exclude.contains(joke.id));
            exclude.insert(joke.id.to_string());
        }
    }

    #[test]
    fn test_exhaustion_falls_back_instead_of_failing() {
        let mut rng = StdRng::seed_from_u64(7);
        let all: HashSet<String> = TRADING_JOKES.iter().map(|j| j.id.to_string()).collect();

        let joke = pick_joke(&mut rng, &all, Some(JokeCategory::Crypto)).unwrap();
        assert_eq!(joke.category, JokeCategory::Crypto);

        assert!(pick_joke(&mut rng, &all, None).is_some());
    }

    #[test]
    fn test_category_filter() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let joke = pick_joke(&mut rng, &HashSet::new(), Some(JokeCategory::Market)).unwrap();
            assert_eq!(joke.category, JokeCategory::Market);
        }
    }

    #[test]
    fn test_pick_by_difficulty_is_strict() {
        let mut rng = StdRng::seed_from_u64(3);
        let advanced: HashSet<String> = TRADING_JOKES
            .iter()
            .filter(|j| j.difficulty == JokeDifficulty::Advanced)
            .map(|j| j.id.to_string())
            .collect();

        assert!(pick_by_difficulty(&mut rng, JokeDifficulty::Advanced, &advanced).is_none());
        assert!(pick_by_difficulty(&mut rng, JokeDifficulty::Easy, &advanced).is_some());
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("tell me a crypto joke"), JokeCategory::Crypto);
        assert_eq!(infer_category("a bear market joke please"), JokeCategory::Market);
        assert_eq!(infer_category("tell me a joke"), JokeCategory::Trading);
    }

    #[test]
    fn test_format_joke() {
        let joke = &TRADING_JOKES[0];
        let text = format_joke(joke);
        assert!(text.starts_with(joke.setup));
        assert!(text.contains("\n\n"));
        assert!(text.ends_with(joke.punchline));
    }
}
