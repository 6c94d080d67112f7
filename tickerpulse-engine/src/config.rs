//! Engine configuration
//!
//! Loaded from TOML. Every section is optional; missing values take the
//! defaults shipped in `config/default.toml`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use tickerpulse_core::{LexiconConfig, LexiconScorer, DEFAULT_VOLUME_WINDOW_HOURS};

use crate::{
    AggregatorConfig, EngineError, ModelScorer, SharedClassifier, SharedScorer, SpamFilterConfig,
    TierPolicy,
};

/// Which scoring strategy to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Lexicon,
    Model,
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scorer: ScorerKind,
    pub volume_window_hours: i64,
    /// Replaces the default keyword tables when present
    pub lexicon: Option<LexiconConfig>,
    pub tiers: TierPolicy,
    pub spam: SpamFilterConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Lexicon,
            volume_window_hours: DEFAULT_VOLUME_WINDOW_HOURS,
            lexicon: None,
            tiers: TierPolicy::default(),
            spam: SpamFilterConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration embedded at build time
    pub fn embedded() -> Result<Self, EngineError> {
        Self::from_toml_str(include_str!("../config/default.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.volume_window_hours <= 0 {
            return Err(EngineError::Config(format!(
                "volume_window_hours must be positive, got {}",
                self.volume_window_hours
            )));
        }
        Ok(())
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_lexicon(mut self, lexicon: LexiconConfig) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn lexicon_scorer(&self) -> LexiconScorer {
        self.lexicon
            .clone()
            .map(LexiconScorer::new)
            .unwrap_or_default()
    }

    /// Build the configured scorer.
    ///
    /// `Model` without a classifier degrades to the lexicon.
    pub fn build_scorer(&self, classifier: Option<SharedClassifier>) -> SharedScorer {
        let lexicon = self.lexicon_scorer();
        match (self.scorer, classifier) {
            (ScorerKind::Model, Some(classifier)) => {
                info!("Scoring with model {}", classifier.model_name());
                Arc::new(ModelScorer::new(classifier, lexicon))
            }
            (ScorerKind::Model, None) => {
                warn!("Model scorer requested but no classifier available, using lexicon");
                Arc::new(lexicon)
            }
            (ScorerKind::Lexicon, _) => Arc::new(lexicon),
        }
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig::default().with_volume_window(Duration::hours(self.volume_window_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classification, ModelError, SentimentClassifier};
    use tickerpulse_core::TrustTier;

    struct Bullish;

    impl SentimentClassifier for Bullish {
        fn classify(&self, _text: &str) -> Result<Classification, ModelError> {
            Ok(Classification::new("POSITIVE", 0.75))
        }

        fn model_name(&self) -> &str {
            "always-bullish"
        }
    }

    #[test]
    fn test_embedded_matches_default() {
        assert_eq!(EngineConfig::embedded().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            volume_window_hours = 6

            [tiers]
            tier1 = ["Crypto_DeFi"]

            [spam]
            threads = true
            watchlist = ["btc"]
            "#,
        )
        .unwrap();

        assert_eq!(config.scorer, ScorerKind::Lexicon);
        assert_eq!(config.aggregator_config().volume_window, Duration::hours(6));
        assert_eq!(config.tiers.tier_for_category("Crypto_DeFi"), TrustTier::Tier1);
        assert!(config.tiers.tier2.is_empty());
        assert!(config.spam.threads);
        assert!(config.spam.enabled);
    }

    #[test]
    fn test_custom_lexicon() {
        let config = EngineConfig::from_toml_str(
            r#"
            [lexicon]
            bullish = [{ phrase = "send it", weight = 1.0 }]
            "#,
        )
        .unwrap();

        let scorer = config.build_scorer(None);
        assert_eq!(scorer.name(), "lexicon");
        assert_eq!(scorer.score("Send it"), 1.0);
        assert_eq!(scorer.score("moon"), 0.0);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            EngineConfig::from_toml_str("volume_window_hours = 0"),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("scorer = \"oracle\""),
            Err(EngineError::Toml(_))
        ));
    }

    #[test]
    fn test_build_model_scorer() {
        let config = EngineConfig::default().with_scorer(ScorerKind::Model);

        let scorer = config.build_scorer(Some(Arc::new(Bullish)));
        assert_eq!(scorer.name(), "always-bullish");
        assert_eq!(scorer.score("crash"), 0.75);

        let scorer = config.build_scorer(None);
        assert_eq!(scorer.name(), "lexicon");
        assert_eq!(scorer.score("crash"), -1.0);
    }
}
