//! Model-backed scoring
//!
//! Wraps an external sentiment classifier behind the [`Scorer`] trait.
//! Classifier failures never reach callers: the lexicon scores instead.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use tickerpulse_core::LexiconScorer;

use crate::Scorer;

/// Classifier input is cut to this many characters
pub const MODEL_MAX_CHARS: usize = 512;

/// Sentiment classifier errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("inference error: {0}")]
    Inference(String),

    #[error("empty response")]
    EmptyResponse,
}

/// A label and its confidence, as returned by a classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// e.g. `positive`, `NEGATIVE`, `neutral`
    pub label: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

impl Classification {
    pub fn new(label: &str, score: f64) -> Self {
        Self {
            label: label.to_string(),
            score,
        }
    }

    /// Convert to a signed score: positive labels keep the confidence,
    /// negative labels flip it, anything else is neutral
    pub fn signed_score(&self) -> f64 {
        let label = self.label.to_lowercase();
        let score = self.score.clamp(0.0, 1.0);
        if label.contains("positive") {
            score
        } else if label.contains("negative") {
            -score
        } else {
            0.0
        }
    }
}

/// Generic sentiment classifier
pub trait SentimentClassifier: Send + Sync {
    /// Classify one text
    fn classify(&self, text: &str) -> Result<Classification, ModelError>;

    /// Whether the model is loaded and usable
    fn is_ready(&self) -> bool {
        true
    }

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Thread-safe reference to a classifier
pub type SharedClassifier = Arc<dyn SentimentClassifier>;

/// Scorer that asks a classifier first and falls back to the lexicon
pub struct ModelScorer {
    classifier: SharedClassifier,
    fallback: LexiconScorer,
}

impl ModelScorer {
    pub fn new(classifier: SharedClassifier, fallback: LexiconScorer) -> Self {
        Self {
            classifier,
            fallback,
        }
    }

    fn classify_score(&self, text: &str) -> Result<f64, ModelError> {
        if !self.classifier.is_ready() {
            return Err(ModelError::Unavailable(
                self.classifier.model_name().to_string(),
            ));
        }

        let truncated: String = text.chars().take(MODEL_MAX_CHARS).collect();
        let classification = self.classifier.classify(&truncated)?;
        Ok(classification.signed_score())
    }
}

impl Scorer for ModelScorer {
    fn score(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        match self.classify_score(text) {
            Ok(score) => score,
            Err(ModelError::Unavailable(model)) => {
                debug!("Model {} not ready, using lexicon", model);
                self.fallback.score_text(text)
            }
            Err(e) => {
                warn!(
                    "Model {} inference failed, using lexicon: {}",
                    self.classifier.model_name(),
                    e
                );
                self.fallback.score_text(text)
            }
        }
    }

    fn name(&self) -> &str {
        self.classifier.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubClassifier {
        ready: bool,
        result: Result<(&'static str, f64), &'static str>,
        seen_len: AtomicUsize,
    }

    impl StubClassifier {
        fn ok(label: &'static str, score: f64) -> Self {
            Self {
                ready: true,
                result: Ok((label, score)),
                seen_len: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                ready: true,
                result: Err("tensor shape mismatch"),
                seen_len: AtomicUsize::new(0),
            }
        }
    }

    impl SentimentClassifier for StubClassifier {
        fn classify(&self, text: &str) -> Result<Classification, ModelError> {
            self.seen_len.store(text.chars().count(), Ordering::SeqCst);
            match self.result {
                Ok((label, score)) => Ok(Classification::new(label, score)),
                Err(msg) => Err(ModelError::Inference(msg.to_string())),
            }
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn model_name(&self) -> &str {
            "stub-sst2"
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(Classification::new("POSITIVE", 0.9).signed_score(), 0.9);
        assert_eq!(Classification::new("negative", 0.7).signed_score(), -0.7);
        assert_eq!(Classification::new("neutral", 0.99).signed_score(), 0.0);
    }

    #[test]
    fn test_model_score_used() {
        let scorer = ModelScorer::new(
            Arc::new(StubClassifier::ok("NEGATIVE", 0.8)),
            LexiconScorer::default(),
        );
        // the lexicon would call this bullish
        assert_eq!(scorer.score("moon breakout"), -0.8);
        assert_eq!(scorer.name(), "stub-sst2");
    }

    #[test]
    fn test_failure_falls_back_to_lexicon() {
        let lexicon = LexiconScorer::default();
        let scorer = ModelScorer::new(Arc::new(StubClassifier::failing()), lexicon.clone());
        let text = "BTC breakout incoming, moon soon";
        assert_eq!(scorer.score(text), lexicon.score_text(text));
    }

    #[test]
    fn test_not_ready_falls_back() {
        let mut stub = StubClassifier::ok("POSITIVE", 1.0);
        stub.ready = false;
        let scorer = ModelScorer::new(Arc::new(stub), LexiconScorer::default());
        assert_eq!(scorer.score("crash incoming"), -1.0);
    }

    #[test]
    fn test_input_truncated_and_empty_is_neutral() {
        let stub = Arc::new(StubClassifier::ok("POSITIVE", 0.6));
        let scorer = ModelScorer::new(stub.clone(), LexiconScorer::default());

        assert_eq!(scorer.score(""), 0.0);
        scorer.score(&"a".repeat(2000));
        assert_eq!(stub.seen_len.load(Ordering::SeqCst), MODEL_MAX_CHARS);
    }
}
