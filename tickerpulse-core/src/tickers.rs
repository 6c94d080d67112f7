//! Cashtag extraction
//!
//! A cashtag is a `$` immediately followed by 1-5 ASCII letters that end
//! on a word boundary (`$BTC`, `$eth`). Symbols are upper-cased.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static CASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z]{1,5})\b").unwrap()
});

/// Extract all cashtag symbols from text, upper-cased and deduplicated
pub fn extract_tickers(text: &str) -> HashSet<String> {
    CASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .collect()
}

/// Whether the text carries a cashtag for `ticker` (case-insensitive)
pub fn mentions_cashtag(text: &str, ticker: &str) -> bool {
    let wanted = normalize_ticker(ticker);
    CASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .any(|m| m.as_str().eq_ignore_ascii_case(&wanted))
}

/// Upper-case a symbol and strip a leading `$`
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().trim_start_matches('$').to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_mixed_case() {
        let tickers = extract_tickers("Loading up on $BTC and $eth today");
        assert_eq!(tickers, set(&["BTC", "ETH"]));
    }

    #[test]
    fn test_no_cashtags() {
        assert!(extract_tickers("bitcoin is going places").is_empty());
        assert!(extract_tickers("").is_empty());
        assert!(extract_tickers("costs $100 now").is_empty());
    }

    #[test]
    fn test_length_limit_and_boundary() {
        // six letters never match, even partially
        assert!(extract_tickers("$BTCUSD breaking out").is_empty());
        assert_eq!(extract_tickers("$GOOGL, $SPY."), set(&["GOOGL", "SPY"]));
        assert!(extract_tickers("$TSLA9").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let tickers = extract_tickers("$sol $SOL $Sol");
        assert_eq!(tickers.len(), 1);
        assert!(tickers.contains("SOL"));
    }

    #[test]
    fn test_mentions_cashtag() {
        assert!(mentions_cashtag("watching $nvda into earnings", "NVDA"));
        assert!(mentions_cashtag("watching $NVDA", "$nvda"));
        assert!(!mentions_cashtag("watching NVDA", "NVDA"));
    }
}
