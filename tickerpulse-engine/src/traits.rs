//! Common traits for scoring collaborators

use std::sync::Arc;
use thiserror::Error;

use tickerpulse_core::{CoreError, LexiconScorer, TrustTier};

/// Errors from engine configuration and input loading
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input error: {0}")]
    Input(#[from] CoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps post text to a signed sentiment score in [-1, 1]
pub trait Scorer: Send + Sync {
    /// Score one text; implementations never fail
    fn score(&self, text: &str) -> f64;

    /// Scorer name for logs
    fn name(&self) -> &str;
}

impl Scorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        self.score_text(text)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Thread-safe reference to a scorer
pub type SharedScorer = Arc<dyn Scorer>;

/// Resolves an author handle to a trust tier
pub trait TrustLookup {
    /// `None` is a lookup miss and weighs like the default tier
    fn tier_for(&self, author: &str) -> Option<TrustTier>;
}

impl<F> TrustLookup for F
where
    F: Fn(&str) -> Option<TrustTier>,
{
    fn tier_for(&self, author: &str) -> Option<TrustTier> {
        self(author)
    }
}

/// Lookup that knows no one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrust;

impl TrustLookup for NoTrust {
    fn tier_for(&self, _author: &str) -> Option<TrustTier> {
        None
    }
}
