//! TickerPulse Core - Post types and scoring primitives for trading sentiment
//!
//! This crate provides the foundational primitives:
//! - Posts, trust tiers and score verdicts
//! - Cashtag extraction
//! - Keyword-weighted lexicon scoring
//! - Per-ticker volume history for spike detection

pub mod error;
pub mod post;
pub mod tickers;
pub mod lexicon;
pub mod history;
pub mod verdict;

pub use error::*;
pub use post::*;
pub use tickers::*;
pub use lexicon::*;
pub use history::*;
pub use verdict::*;

/// Aggregate sentiment above this is bullish
pub const BULLISH_THRESHOLD: f64 = 0.15;

/// Aggregate sentiment below this is bearish
pub const BEARISH_THRESHOLD: f64 = -0.15;

/// Aggregate sentiment above this is very bullish
pub const VERY_BULLISH_THRESHOLD: f64 = 0.3;

/// Aggregate sentiment below this is very bearish
pub const VERY_BEARISH_THRESHOLD: f64 = -0.3;

/// Per-post score standard deviation above this marks the batch volatile
pub const HIGH_VOL_THRESHOLD: f64 = 0.35;

/// A single post scoring above this counts as bullish in the breakdown
pub const POST_BULLISH_CUTOFF: f64 = 0.2;

/// A single post scoring below this counts as bearish in the breakdown
pub const POST_BEARISH_CUTOFF: f64 = -0.2;

/// Default retention window for volume history, in hours
pub const DEFAULT_VOLUME_WINDOW_HOURS: i64 = 24;

/// Prior observations required before a volume spike can be reported
pub const MIN_VOLUME_HISTORY: usize = 3;

/// Current batch must exceed the historical average by this factor
pub const VOLUME_SPIKE_MULTIPLIER: f64 = 2.0;

/// Maximum number of influencer posts reported in a verdict
pub const TOP_INFLUENCER_POSTS: usize = 5;
