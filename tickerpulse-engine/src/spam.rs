//! Spam Filter
//!
//! Drops engagement bait and other noise before scoring.
//! - Exempt: tiered authors, configured handles, watchlist mentions
//! - Rules run in a fixed order; the first hit names the reason

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info};

use tickerpulse_core::{normalize_handle, normalize_ticker, Post};

use crate::{ExtendedMatcher, TrustLookup};

static ENGAGEMENT_BAIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)RT if|like if|retweet if|follow for|tag someone|agree\?|thoughts\?|comment below").unwrap()
});

static PROMO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)discord\.gg|t\.me/|telegram|buy my course|premium signals|vip group|giveaway|airdrop|free signals|join my|dm for|link in bio").unwrap()
});

static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1F300}-\x{1F9FF}]|[\x{2600}-\x{26FF}]").unwrap()
});

static CRYPTO_SCAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)send eth|send btc|double your|guaranteed returns|100x gain|0x[a-fA-F0-9]{40}|verify your wallet|claim your|connect wallet").unwrap()
});

static DISCLAIMER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)not financial advice|this is not advice|\bNFA\b|do your own research|\bDYOR\b|not a recommendation").unwrap()
});

static THREAD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)🧵|thread:|1/\d+|part 1 of").unwrap()
});

static OLD_NEWS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)yesterday|last week|last month|days ago|weeks ago").unwrap()
});

/// More emoji than this is emoji spam
const MAX_EMOJI: usize = 7;

/// Posts shorter than this (emoji removed) with no ticker are too short
const MIN_TEXT_CHARS: usize = 15;

/// Why a post was classified as spam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamReason {
    EngagementBait,
    Promotional,
    EmojiSpam,
    TooShort,
    CryptoScam,
    Disclaimer,
    Thread,
    OldNews,
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngagementBait => write!(f, "Engagement bait"),
            Self::Promotional => write!(f, "Promotional"),
            Self::EmojiSpam => write!(f, "Emoji spam"),
            Self::TooShort => write!(f, "Too short"),
            Self::CryptoScam => write!(f, "Crypto scam"),
            Self::Disclaimer => write!(f, "Disclaimer"),
            Self::Thread => write!(f, "Thread"),
            Self::OldNews => write!(f, "Old news"),
        }
    }
}

/// Result of checking one post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamVerdict {
    Clean,
    Spam(SpamReason),
}

impl SpamVerdict {
    pub fn is_spam(&self) -> bool {
        matches!(self, Self::Spam(_))
    }
}

/// Spam filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamFilterConfig {
    pub enabled: bool,
    pub engagement_bait: bool,
    pub promotional: bool,
    pub low_effort: bool,
    pub crypto_scams: bool,
    pub disclaimers: bool,
    pub threads: bool,
    pub old_news: bool,
    /// Posts mentioning these tickers are never filtered
    pub watchlist: Vec<String>,
    /// Handles that are never filtered
    pub exempt_authors: Vec<String>,
}

impl Default for SpamFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engagement_bait: true,
            promotional: true,
            low_effort: true,
            crypto_scams: true,
            disclaimers: true,
            threads: false,
            old_news: true,
            watchlist: Vec::new(),
            exempt_authors: Vec::new(),
        }
    }
}

impl SpamFilterConfig {
    pub fn with_watchlist(mut self, tickers: &[&str]) -> Self {
        self.watchlist.extend(tickers.iter().map(|t| normalize_ticker(t)));
        self
    }

    pub fn with_exempt_author(mut self, handle: &str) -> Self {
        self.exempt_authors.push(normalize_handle(handle));
        self
    }
}

/// A post removed by the filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedPost {
    pub post: Post,
    pub reason: SpamReason,
}

/// Output of filtering a batch
#[derive(Debug, Clone, Default)]
pub struct FilteredBatch {
    pub kept: Vec<Post>,
    pub removed: Vec<RemovedPost>,
}

/// Rule-based spam filter
pub struct SpamFilter {
    config: SpamFilterConfig,
    matcher: ExtendedMatcher,
}

impl SpamFilter {
    pub fn new(config: SpamFilterConfig) -> Self {
        Self::with_matcher(config, ExtendedMatcher::default())
    }

    pub fn with_matcher(mut config: SpamFilterConfig, matcher: ExtendedMatcher) -> Self {
        config.watchlist = config.watchlist.iter().map(|t| normalize_ticker(t)).collect();
        config.exempt_authors = config
            .exempt_authors
            .iter()
            .map(|h| normalize_handle(h))
            .collect();
        Self { config, matcher }
    }

    pub fn config(&self) -> &SpamFilterConfig {
        &self.config
    }

    /// Classify one post
    pub fn check<T: TrustLookup + ?Sized>(&self, post: &Post, trust: &T) -> SpamVerdict {
        if !self.config.enabled {
            return SpamVerdict::Clean;
        }

        let author = normalize_handle(&post.author);
        if self.config.exempt_authors.contains(&author) {
            return SpamVerdict::Clean;
        }
        if trust.tier_for(&author).is_some_and(|tier| tier.is_tiered()) {
            return SpamVerdict::Clean;
        }

        let text = post.text.as_str();
        let tickers = self.matcher.all_tickers(text);
        if tickers.iter().any(|t| self.config.watchlist.contains(t)) {
            return SpamVerdict::Clean;
        }

        let cfg = &self.config;

        if cfg.engagement_bait && ENGAGEMENT_BAIT_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::EngagementBait);
        }

        if cfg.promotional && PROMO_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::Promotional);
        }

        if cfg.low_effort {
            let emoji_count = EMOJI_REGEX.find_iter(text).count();
            if emoji_count > MAX_EMOJI {
                return SpamVerdict::Spam(SpamReason::EmojiSpam);
            }

            let stripped = EMOJI_REGEX.replace_all(text, "");
            if stripped.trim().chars().count() < MIN_TEXT_CHARS && tickers.is_empty() {
                return SpamVerdict::Spam(SpamReason::TooShort);
            }
        }

        if cfg.crypto_scams && CRYPTO_SCAM_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::CryptoScam);
        }

        if cfg.disclaimers && DISCLAIMER_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::Disclaimer);
        }

        if cfg.threads && THREAD_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::Thread);
        }

        if cfg.old_news && OLD_NEWS_REGEX.is_match(text) {
            return SpamVerdict::Spam(SpamReason::OldNews);
        }

        SpamVerdict::Clean
    }

    /// Split a batch into kept and removed posts, preserving order
    pub fn filter_batch<T: TrustLookup + ?Sized>(&self, posts: &[Post], trust: &T) -> FilteredBatch {
        let mut batch = FilteredBatch::default();

        for post in posts {
            match self.check(post, trust) {
                SpamVerdict::Clean => batch.kept.push(post.clone()),
                SpamVerdict::Spam(reason) => {
                    debug!("Filtered post by @{}: {}", post.author, reason);
                    batch.removed.push(RemovedPost {
                        post: post.clone(),
                        reason,
                    });
                }
            }
        }

        if !batch.removed.is_empty() {
            info!(
                "Spam filter removed {} of {} posts",
                batch.removed.len(),
                posts.len()
            );
        }
        batch
    }
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::new(SpamFilterConfig::default())
    }
}
