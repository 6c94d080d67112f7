//! Keyword-weighted lexicon scoring
//!
//! Text is scored by weighted keyword presence:
//! - Each bullish or bearish phrase found anywhere in the lower-cased text
//!   adds its weight to that side and to the total
//! - The score is `(bullish - bearish) / total`, clamped to [-1, 1]
//! - Volatility phrases are counted but never move the score
//!
//! Matching is plain substring containment, not word-boundary matching:
//! "pump" matches inside "pumpkin" and "up" matches inside "support".
//! Weights are expected to be in (0, 1]; tables are not validated.

use serde::{Deserialize, Serialize};

/// A lexicon phrase and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub phrase: String,
    pub weight: f64,
}

impl KeywordWeight {
    pub fn new(phrase: &str, weight: f64) -> Self {
        Self {
            phrase: phrase.to_lowercase(),
            weight,
        }
    }
}

/// Default bullish phrases
pub static DEFAULT_BULLISH_KEYWORDS: &[(&str, f64)] = &[
    // strong
    ("moon", 0.8), ("mooning", 0.9), ("breakout", 0.7), ("bullish", 0.6),
    ("pump", 0.5), ("rally", 0.6), ("surge", 0.6), ("soar", 0.7),
    ("ath", 0.8), ("all time high", 0.8), ("new high", 0.7),
    ("bullrun", 0.8), ("bull run", 0.8), ("parabolic", 0.9),
    ("explosion", 0.7), ("exploding", 0.7), ("skyrocket", 0.8),
    // medium
    ("buy", 0.3), ("buying", 0.3), ("long", 0.4), ("longing", 0.4),
    ("accumulate", 0.4), ("accumulation", 0.4), ("load up", 0.5),
    ("undervalued", 0.5), ("oversold", 0.4), ("dip", 0.2),
    ("support", 0.3), ("holding", 0.2), ("hodl", 0.4),
    // mild
    ("green", 0.2), ("gains", 0.3), ("profit", 0.3), ("up", 0.1),
    ("bullish divergence", 0.6), ("golden cross", 0.7),
    ("higher low", 0.4), ("higher high", 0.4),
];

/// Default bearish phrases
pub static DEFAULT_BEARISH_KEYWORDS: &[(&str, f64)] = &[
    // strong
    ("crash", 0.8), ("crashed", 0.8), ("crashing", 0.9), ("dump", 0.7),
    ("dumping", 0.7), ("plunge", 0.8), ("plummeting", 0.8), ("collapse", 0.9),
    ("bearish", 0.6), ("selloff", 0.7), ("sell-off", 0.7),
    ("capitulation", 0.8), ("liquidation", 0.7), ("liquidated", 0.7),
    ("rekt", 0.6), ("wrecked", 0.6), ("destroyed", 0.5),
    // medium
    ("sell", 0.3), ("selling", 0.3), ("short", 0.4), ("shorting", 0.4),
    ("overbought", 0.4), ("overvalued", 0.5), ("resistance", 0.2),
    ("breakdown", 0.5), ("break down", 0.5), ("breaking down", 0.6),
    // mild
    ("red", 0.2), ("loss", 0.3), ("losses", 0.3), ("down", 0.1),
    ("bearish divergence", 0.6), ("death cross", 0.7),
    ("lower high", 0.4), ("lower low", 0.4), ("rejection", 0.3),
];

/// Default volatility phrases
pub static DEFAULT_VOLATILITY_KEYWORDS: &[&str] = &[
    "volatile", "volatility", "choppy", "whipsaw", "wild",
    "uncertain", "unstable", "swinging", "unpredictable",
    "squeeze", "gamma squeeze", "short squeeze",
];

/// Keyword tables for a lexicon scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub bullish: Vec<KeywordWeight>,
    #[serde(default)]
    pub bearish: Vec<KeywordWeight>,
    #[serde(default)]
    pub volatility: Vec<String>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            bullish: DEFAULT_BULLISH_KEYWORDS
                .iter()
                .map(|(p, w)| KeywordWeight::new(p, *w))
                .collect(),
            bearish: DEFAULT_BEARISH_KEYWORDS
                .iter()
                .map(|(p, w)| KeywordWeight::new(p, *w))
                .collect(),
            volatility: DEFAULT_VOLATILITY_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LexiconConfig {
    /// An empty lexicon; every text scores neutral
    pub fn empty() -> Self {
        Self {
            bullish: Vec::new(),
            bearish: Vec::new(),
            volatility: Vec::new(),
        }
    }

    pub fn with_bullish(mut self, phrase: &str, weight: f64) -> Self {
        self.bullish.push(KeywordWeight::new(phrase, weight));
        self
    }

    pub fn with_bearish(mut self, phrase: &str, weight: f64) -> Self {
        self.bearish.push(KeywordWeight::new(phrase, weight));
        self
    }

    pub fn with_volatility(mut self, phrase: &str) -> Self {
        self.volatility.push(phrase.to_lowercase());
        self
    }

    /// Lower-case every phrase so matching stays case-insensitive for
    /// tables loaded from files
    fn normalized(mut self) -> Self {
        for kw in self.bullish.iter_mut().chain(self.bearish.iter_mut()) {
            kw.phrase = kw.phrase.to_lowercase();
        }
        for phrase in &mut self.volatility {
            *phrase = phrase.to_lowercase();
        }
        self
    }
}

/// Detailed result of scoring one text
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexiconScore {
    /// Final score in [-1, 1]
    pub score: f64,
    /// Sum of matched bullish weights
    pub bullish: f64,
    /// Sum of matched bearish weights
    pub bearish: f64,
    /// Sum of all matched weights
    pub total_weight: f64,
    /// Number of volatility phrases present
    pub volatility_hits: usize,
}

/// Scores text against fixed keyword tables
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    config: LexiconConfig,
}

impl LexiconScorer {
    pub fn new(config: LexiconConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    /// Score text and report the matched weights
    pub fn analyze(&self, text: &str) -> LexiconScore {
        if text.is_empty() {
            return LexiconScore::default();
        }

        let lower = text.to_lowercase();
        let mut result = LexiconScore::default();

        for kw in &self.config.bullish {
            if lower.contains(kw.phrase.as_str()) {
                result.bullish += kw.weight;
                result.total_weight += kw.weight;
            }
        }

        for kw in &self.config.bearish {
            if lower.contains(kw.phrase.as_str()) {
                result.bearish += kw.weight;
                result.total_weight += kw.weight;
            }
        }

        result.volatility_hits = self
            .config
            .volatility
            .iter()
            .filter(|phrase| lower.contains(phrase.as_str()))
            .count();

        if result.total_weight > 0.0 {
            result.score =
                ((result.bullish - result.bearish) / result.total_weight).clamp(-1.0, 1.0);
        }

        result
    }

    /// Score text in [-1, 1]; text with no keyword scores 0
    pub fn score_text(&self, text: &str) -> f64 {
        self.analyze(text).score
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(LexiconConfig::default())
    }
}
