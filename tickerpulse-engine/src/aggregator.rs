//! Aggregator
//!
//! Reduces a batch of posts for one ticker to a [`ScoreVerdict`]:
//! - Per-post scores come from the configured [`Scorer`]
//! - Trust tiers weight each post's contribution
//! - Volume history flags abnormal batch sizes

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use tickerpulse_core::{
    is_volume_spike, normalize_ticker, tier_weight, Breakdown, InMemoryVolumeHistory,
    InfluencerPost, Post, PostLean, ScoreVerdict, TrustTier, VerdictStatus, VolumeEntry,
    VolumeHistoryStore, DEFAULT_VOLUME_WINDOW_HOURS, TOP_INFLUENCER_POSTS,
};

use crate::{SharedScorer, TickerMatcher, TrustLookup};

/// Aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// How long volume observations are retained
    pub volume_window: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            volume_window: Duration::hours(DEFAULT_VOLUME_WINDOW_HOURS),
        }
    }
}

impl AggregatorConfig {
    pub fn with_volume_window(mut self, window: Duration) -> Self {
        self.volume_window = window;
        self
    }
}

/// One scored post inside a batch
#[derive(Debug, Clone, Copy)]
struct PostScore {
    score: f64,
    weight: f64,
    tier: Option<TrustTier>,
}

/// Ticker-level sentiment aggregator
pub struct Aggregator {
    config: AggregatorConfig,
    scorer: SharedScorer,
    history: Arc<dyn VolumeHistoryStore>,
}

impl Aggregator {
    pub fn new(scorer: SharedScorer, history: Arc<dyn VolumeHistoryStore>) -> Self {
        Self::with_config(AggregatorConfig::default(), scorer, history)
    }

    /// Aggregator with a fresh in-memory history
    pub fn in_memory(scorer: SharedScorer) -> Self {
        Self::new(scorer, Arc::new(InMemoryVolumeHistory::new()))
    }

    pub fn with_config(
        config: AggregatorConfig,
        scorer: SharedScorer,
        history: Arc<dyn VolumeHistoryStore>,
    ) -> Self {
        Self {
            config,
            scorer,
            history,
        }
    }

    pub fn scorer(&self) -> &SharedScorer {
        &self.scorer
    }

    pub fn history(&self) -> &Arc<dyn VolumeHistoryStore> {
        &self.history
    }

    /// Analyze a batch as of now
    pub fn analyze_ticker<T: TrustLookup + ?Sized>(
        &self,
        posts: &[Post],
        ticker: Option<&str>,
        trust: &T,
    ) -> ScoreVerdict {
        self.analyze_ticker_at(posts, ticker, trust, Utc::now())
    }

    /// Analyze a batch as of `now`.
    ///
    /// With a ticker, the batch size is recorded in that ticker's history.
    /// An empty batch records nothing and yields `NoData`.
    pub fn analyze_ticker_at<T: TrustLookup + ?Sized>(
        &self,
        posts: &[Post],
        ticker: Option<&str>,
        trust: &T,
        now: DateTime<Utc>,
    ) -> ScoreVerdict {
        if posts.is_empty() {
            debug!("No posts for {}", ticker.unwrap_or("<batch>"));
            return ScoreVerdict::no_data();
        }

        let sample_size = posts.len();

        let prior = ticker.map(|t| {
            self.history.record(
                &normalize_ticker(t),
                VolumeEntry::new(sample_size, now),
                self.config.volume_window,
            )
        });

        let scored: Vec<PostScore> = posts
            .iter()
            .map(|post| {
                let tier = trust.tier_for(&post.author);
                PostScore {
                    score: self.scorer.score(&post.text),
                    weight: tier_weight(tier),
                    tier,
                }
            })
            .collect();

        let mut breakdown = Breakdown::default();
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for s in &scored {
            weighted_sum += s.score * s.weight;
            total_weight += s.weight;
            breakdown.add(PostLean::from_score(s.score));
        }

        let sentiment = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };

        let std_dev = population_std_dev(scored.iter().map(|s| s.score));

        let volume_spike = prior
            .as_deref()
            .is_some_and(|history| is_volume_spike(history, sample_size));
        if volume_spike {
            info!(
                "Volume spike on {}: {} posts",
                ticker.unwrap_or_default(),
                sample_size
            );
        }

        let status = VerdictStatus::classify(sentiment, std_dev, volume_spike);

        let mut influencers: Vec<InfluencerPost> = posts
            .iter()
            .zip(&scored)
            .filter_map(|(post, s)| match s.tier {
                Some(tier) if tier.is_tiered() => Some(InfluencerPost {
                    post: post.clone(),
                    score: s.score,
                    tier,
                }),
                _ => None,
            })
            .collect();
        let influencer_count = influencers.len();

        // stable: equal magnitudes keep batch order
        influencers.sort_by(|a, b| b.score.abs().total_cmp(&a.score.abs()));
        influencers.truncate(TOP_INFLUENCER_POSTS);

        debug!(
            "{} via {}: {} ({:.3}) over {} posts, std dev {:.3}",
            ticker.unwrap_or("<batch>"),
            self.scorer.name(),
            status,
            sentiment,
            sample_size,
            std_dev
        );

        ScoreVerdict {
            sentiment,
            status,
            sample_size,
            breakdown,
            std_dev,
            volume_spike,
            influencer_count,
            top_influencer_posts: influencers,
            weighted_sum,
            total_weight,
        }
    }

    /// Analyze only the posts that mention `ticker` according to `matcher`
    pub fn analyze_mentions<M, T>(
        &self,
        posts: &[Post],
        ticker: &str,
        matcher: &M,
        trust: &T,
    ) -> ScoreVerdict
    where
        M: TickerMatcher + ?Sized,
        T: TrustLookup + ?Sized,
    {
        let mentions: Vec<Post> = posts
            .iter()
            .filter(|post| matcher.mentions(&post.text, ticker))
            .cloned()
            .collect();

        debug!(
            "{} of {} posts mention {}",
            mentions.len(),
            posts.len(),
            ticker
        );
        self.analyze_ticker(&mentions, Some(ticker), trust)
    }
}

/// Population standard deviation; 0 for no values
fn population_std_dev<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }

    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CashtagMatcher, NoTrust, Scorer, TrustDirectory};
    use tickerpulse_core::LexiconScorer;

    /// Scores a post by parsing its text as a number
    struct FixedScorer;

    impl Scorer for FixedScorer {
        fn score(&self, text: &str) -> f64 {
            text.trim().parse().unwrap_or(0.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn fixed() -> Aggregator {
        Aggregator::in_memory(Arc::new(FixedScorer))
    }

    fn posts(scores: &[&str]) -> Vec<Post> {
        scores.iter().map(|s| Post::new(s)).collect()
    }

    fn directory() -> TrustDirectory {
        let mut directory = TrustDirectory::new();
        directory.insert("federalreserve", TrustTier::Tier1);
        directory.insert("reuters", TrustTier::Tier2);
        directory.insert("chartguy", TrustTier::Tier3);
        directory.insert("plainjoe", TrustTier::Default);
        directory
    }

    #[test]
    fn test_empty_batch() {
        let aggregator = fixed();
        let verdict = aggregator.analyze_ticker(&[], Some("BTC"), &NoTrust);

        assert_eq!(verdict.status, VerdictStatus::NoData);
        assert_eq!(verdict.sample_size, 0);
        assert_eq!(verdict.sentiment, 0.0);
        assert!(!verdict.volume_spike);
        assert!(aggregator.history().get("BTC").is_empty());
    }

    #[test]
    fn test_breakdown_counts() {
        let verdict = fixed().analyze_ticker(
            &posts(&["0.5", "0.9", "0.3", "-0.6", "0.0"]),
            None,
            &NoTrust,
        );

        assert_eq!(verdict.sample_size, 5);
        assert_eq!(verdict.breakdown.bullish, 3);
        assert_eq!(verdict.breakdown.bearish, 1);
        assert_eq!(verdict.breakdown.neutral, 1);
        assert_eq!(verdict.breakdown.total(), verdict.sample_size);
    }

    #[test]
    fn test_threshold_boundary() {
        let aggregator = fixed();

        let verdict = aggregator.analyze_ticker(&posts(&["0.16", "0.16"]), None, &NoTrust);
        assert_eq!(verdict.status, VerdictStatus::Bullish);

        let verdict = aggregator.analyze_ticker(&posts(&["0.15", "0.15"]), None, &NoTrust);
        assert_eq!(verdict.status, VerdictStatus::Neutral);
    }

    #[test]
    fn test_high_dispersion_is_volatile() {
        let verdict = fixed().analyze_ticker(&posts(&["1.0", "-1.0"]), None, &NoTrust);
        assert_eq!(verdict.std_dev, 1.0);
        assert_eq!(verdict.status, VerdictStatus::Volatile);
    }

    #[test]
    fn test_trust_weighting() {
        let aggregator = fixed();
        let trust = directory();

        let tiered = aggregator.analyze_ticker(
            &[Post::new("0.5").with_author("federalreserve")],
            None,
            &trust,
        );
        let untiered =
            aggregator.analyze_ticker(&[Post::new("0.5").with_author("nobody")], None, &trust);
        assert_eq!(tiered.weighted_sum, 3.0 * untiered.weighted_sum);

        // (1.0 * 3 + -1.0 * 1) / 4
        let mixed = aggregator.analyze_ticker(
            &[
                Post::new("1.0").with_author("@FederalReserve"),
                Post::new("-1.0").with_author("nobody"),
            ],
            None,
            &trust,
        );
        assert_eq!(mixed.total_weight, 4.0);
        assert_eq!(mixed.sentiment, 0.5);
    }

    #[test]
    fn test_influencer_ranking() {
        let batch = vec![
            Post::new("0.2").with_author("chartguy"),
            Post::new("-0.9").with_author("reuters"),
            Post::new("0.95").with_author("random"),
            Post::new("0.4").with_author("federalreserve"),
            Post::new("-0.4").with_author("chartguy"),
            Post::new("0.1").with_author("reuters"),
            Post::new("0.7").with_author("chartguy"),
            Post::new("0.9").with_author("plainjoe"),
        ];
        let verdict = fixed().analyze_ticker(&batch, None, &directory());

        assert_eq!(verdict.influencer_count, 6);
        let top: Vec<f64> = verdict.top_influencer_posts.iter().map(|p| p.score).collect();
        assert_eq!(top, vec![-0.9, 0.7, 0.4, -0.4, 0.2]);
        assert_eq!(verdict.top_influencer_posts[2].tier, TrustTier::Tier1);
        assert_eq!(verdict.top_influencer_posts[3].post.author, "chartguy");
    }

    #[test]
    fn test_volume_spike() {
        let now = Utc::now();
        let seed = |aggregator: &Aggregator| {
            for hours_ago in [3, 2, 1] {
                aggregator
                    .history()
                    .append("BTC", VolumeEntry::new(10, now - Duration::hours(hours_ago)));
            }
        };

        let aggregator = fixed();
        seed(&aggregator);
        let verdict =
            aggregator.analyze_ticker_at(&posts(&["0"; 25]), Some("btc"), &NoTrust, now);
        assert!(verdict.volume_spike);
        assert_eq!(verdict.status, VerdictStatus::Volatile);

        let aggregator = fixed();
        seed(&aggregator);
        let verdict =
            aggregator.analyze_ticker_at(&posts(&["0"; 15]), Some("BTC"), &NoTrust, now);
        assert!(!verdict.volume_spike);
        assert_eq!(verdict.status, VerdictStatus::Neutral);
        assert_eq!(aggregator.history().get("BTC").len(), 4);
    }

    #[test]
    fn test_spike_needs_history_and_ticker() {
        let aggregator = fixed();
        let now = Utc::now();
        aggregator
            .history()
            .append("ETH", VolumeEntry::new(1, now - Duration::hours(1)));

        let verdict = aggregator.analyze_ticker_at(&posts(&["0"; 50]), Some("ETH"), &NoTrust, now);
        assert!(!verdict.volume_spike);

        let verdict = aggregator.analyze_ticker_at(&posts(&["0"; 50]), None, &NoTrust, now);
        assert!(!verdict.volume_spike);
    }

    #[test]
    fn test_stale_history_ignored() {
        let aggregator = fixed();
        let now = Utc::now();
        for hours_ago in [30, 29, 28] {
            aggregator
                .history()
                .append("SOL", VolumeEntry::new(1, now - Duration::hours(hours_ago)));
        }

        let verdict = aggregator.analyze_ticker_at(&posts(&["0"; 10]), Some("SOL"), &NoTrust, now);
        assert!(!verdict.volume_spike);
        assert_eq!(aggregator.history().get("SOL").len(), 1);
    }

    #[test]
    fn test_lexicon_end_to_end() {
        let aggregator = Aggregator::in_memory(Arc::new(LexiconScorer::default()));
        let batch = vec![
            Post::new("$BTC breakout incoming, moon soon 🚀"),
            Post::new("$BTC rally into the weekly close"),
            Post::new(""),
        ];
        let verdict = aggregator.analyze_ticker(&batch, Some("BTC"), &NoTrust);

        assert_eq!(verdict.sample_size, 3);
        assert_eq!(verdict.breakdown.bullish, 2);
        assert_eq!(verdict.breakdown.neutral, 1);
        assert!(verdict.sentiment > 0.0);
        assert!((-1.0..=1.0).contains(&verdict.sentiment));
    }

    #[test]
    fn test_analyze_mentions() {
        let aggregator = fixed();
        let batch = vec![
            Post::new("0.9 $ETH"),
            Post::new("-0.9 $SOL"),
            Post::new("0.5 $eth"),
        ];

        let by_text = |text: &str, ticker: &str| mentions_first_token(text, ticker);
        let verdict = aggregator.analyze_mentions(&batch, "ETH", &by_text, &NoTrust);
        assert_eq!(verdict.sample_size, 2);

        let verdict = aggregator.analyze_mentions(&batch, "ETH", &CashtagMatcher, &NoTrust);
        assert_eq!(verdict.sample_size, 2);
        assert_eq!(aggregator.history().get("ETH").len(), 2);
    }

    fn mentions_first_token(text: &str, ticker: &str) -> bool {
        text.split_whitespace()
            .nth(1)
            .is_some_and(|tag| tag.trim_start_matches('$').eq_ignore_ascii_case(ticker))
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(population_std_dev(std::iter::empty()), 0.0);
        assert_eq!(population_std_dev([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter()), 2.0);
    }
}
