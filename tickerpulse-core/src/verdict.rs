//! Ticker-level score verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    Post, TrustTier, BEARISH_THRESHOLD, BULLISH_THRESHOLD, HIGH_VOL_THRESHOLD,
    POST_BEARISH_CUTOFF, POST_BULLISH_CUTOFF, VERY_BEARISH_THRESHOLD, VERY_BULLISH_THRESHOLD,
};

/// Classification of an aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
    Volatile,
    /// Empty batch; a terminal state, not an error
    NoData,
}

impl VerdictStatus {
    /// Classify in precedence order: volatility first, then sentiment bands.
    /// Every comparison is strict.
    pub fn classify(sentiment: f64, std_dev: f64, volume_spike: bool) -> Self {
        if std_dev > HIGH_VOL_THRESHOLD || volume_spike {
            Self::Volatile
        } else if sentiment > VERY_BULLISH_THRESHOLD {
            Self::VeryBullish
        } else if sentiment > BULLISH_THRESHOLD {
            Self::Bullish
        } else if sentiment < VERY_BEARISH_THRESHOLD {
            Self::VeryBearish
        } else if sentiment < BEARISH_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryBullish => write!(f, "VERY BULLISH"),
            Self::Bullish => write!(f, "BULLISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::VeryBearish => write!(f, "VERY BEARISH"),
            Self::Volatile => write!(f, "VOLATILE"),
            Self::NoData => write!(f, "NO DATA"),
        }
    }
}

/// Per-post direction used in the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostLean {
    Bullish,
    Bearish,
    Neutral,
}

impl PostLean {
    pub fn from_score(score: f64) -> Self {
        if score > POST_BULLISH_CUTOFF {
            Self::Bullish
        } else if score < POST_BEARISH_CUTOFF {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

/// Unweighted per-post counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl Breakdown {
    pub fn add(&mut self, lean: PostLean) {
        match lean {
            PostLean::Bullish => self.bullish += 1,
            PostLean::Bearish => self.bearish += 1,
            PostLean::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.bullish + self.bearish + self.neutral
    }
}

/// A scored post from a tiered author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerPost {
    pub post: Post,
    pub score: f64,
    pub tier: TrustTier,
}

/// Aggregate verdict for one ticker at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreVerdict {
    /// Weighted mean of per-post scores, in [-1, 1]
    pub sentiment: f64,
    pub status: VerdictStatus,
    pub sample_size: usize,
    pub breakdown: Breakdown,
    /// Population standard deviation of raw per-post scores
    pub std_dev: f64,
    pub volume_spike: bool,
    /// Posts whose author has a non-default tier
    pub influencer_count: usize,
    /// Highest-magnitude influencer posts, batch order breaking ties
    pub top_influencer_posts: Vec<InfluencerPost>,
    /// Sum of score times trust weight
    pub weighted_sum: f64,
    /// Sum of trust weights
    pub total_weight: f64,
}

impl ScoreVerdict {
    /// Verdict for an empty batch
    pub fn no_data() -> Self {
        Self {
            sentiment: 0.0,
            status: VerdictStatus::NoData,
            sample_size: 0,
            breakdown: Breakdown::default(),
            std_dev: 0.0,
            volume_spike: false,
            influencer_count: 0,
            top_influencer_posts: Vec::new(),
            weighted_sum: 0.0,
            total_weight: 0.0,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.status == VerdictStatus::NoData
    }
}
