//! Ticker matchers
//!
//! Decide whether a post mentions a ticker.
//! - [`CashtagMatcher`]: `$SYMBOL` only
//! - [`ExtendedMatcher`]: cashtags, crypto names and common bare symbols

use regex::Regex;
use std::collections::HashSet;

use tickerpulse_core::{extract_tickers, mentions_cashtag, normalize_ticker};

/// "Does this text mention this ticker"
pub trait TickerMatcher {
    fn mentions(&self, text: &str, ticker: &str) -> bool;
}

impl<F> TickerMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn mentions(&self, text: &str, ticker: &str) -> bool {
        self(text, ticker)
    }
}

/// Matches cashtags only
#[derive(Debug, Clone, Copy, Default)]
pub struct CashtagMatcher;

impl TickerMatcher for CashtagMatcher {
    fn mentions(&self, text: &str, ticker: &str) -> bool {
        mentions_cashtag(text, ticker)
    }
}

/// Full crypto names (and lowercase symbols) mapped to tickers
pub static DEFAULT_CRYPTO_NAMES: &[(&str, &str)] = &[
    ("bitcoin", "BTC"), ("btc", "BTC"),
    ("ethereum", "ETH"), ("eth", "ETH"),
    ("solana", "SOL"), ("sol", "SOL"),
    ("ripple", "XRP"), ("xrp", "XRP"),
    ("dogecoin", "DOGE"), ("doge", "DOGE"),
    ("cardano", "ADA"), ("avalanche", "AVAX"),
    ("polygon", "MATIC"), ("polkadot", "DOT"), ("chainlink", "LINK"),
];

/// Symbols recognized as bare words
pub static DEFAULT_COMMON_TICKERS: &[&str] = &[
    "BTC", "ETH", "SOL", "XRP", "DOGE", "ADA", "AVAX", "MATIC", "DOT", "LINK",
    "SPY", "QQQ", "TSLA", "NVDA", "AAPL", "MSFT", "AMZN", "GOOGL", "META", "AMD",
    "GME", "AMC", "PLTR", "NIO", "RIVN", "LCID", "SOFI", "COIN", "HOOD", "MARA",
    "VIX", "DXY", "GLD", "SLV", "USO", "UNG", "TLT", "IWM", "DIA", "XLF",
];

/// Matches cashtags, crypto names and common bare symbols
#[derive(Debug, Clone)]
pub struct ExtendedMatcher {
    names: Vec<(Regex, String)>,
    common: HashSet<String>,
}

impl ExtendedMatcher {
    /// A matcher with no names or bare symbols; behaves like cashtags only
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            common: HashSet::new(),
        }
    }

    pub fn with_name(mut self, name: &str, ticker: &str) -> Self {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
        // escaped input always forms a valid pattern
        if let Ok(regex) = Regex::new(&pattern) {
            self.names.push((regex, normalize_ticker(ticker)));
        }
        self
    }

    pub fn with_common_ticker(mut self, ticker: &str) -> Self {
        self.common.insert(normalize_ticker(ticker));
        self
    }

    /// Every ticker this matcher sees in the text
    pub fn all_tickers(&self, text: &str) -> HashSet<String> {
        let mut tickers = extract_tickers(text);

        for (regex, ticker) in &self.names {
            if regex.is_match(text) {
                tickers.insert(ticker.clone());
            }
        }

        for word in text.to_uppercase().split_whitespace() {
            let clean: String = word.chars().filter(|c| c.is_ascii_uppercase()).collect();
            if self.common.contains(&clean) {
                tickers.insert(clean);
            }
        }

        tickers
    }
}

impl Default for ExtendedMatcher {
    fn default() -> Self {
        let mut matcher = Self::empty();
        for (name, ticker) in DEFAULT_CRYPTO_NAMES {
            matcher = matcher.with_name(name, ticker);
        }
        for ticker in DEFAULT_COMMON_TICKERS {
            matcher = matcher.with_common_ticker(ticker);
        }
        matcher
    }
}

impl TickerMatcher for ExtendedMatcher {
    fn mentions(&self, text: &str, ticker: &str) -> bool {
        self.all_tickers(text).contains(&normalize_ticker(ticker))
    }
}
