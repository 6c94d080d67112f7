//! Social posts and author trust tiers
//!
//! Posts are the unit of input to scoring:
//! - Text is scored as-is (cashtags, emoji and URLs included)
//! - Authors are normalized handles used for trust lookups
//! - Raw JSON shapes are normalized once, at the edge

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{json_kind, CoreError};

/// One unit of social content to be scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Raw content
    pub text: String,
    /// Lowercase handle without leading `@`; empty when unknown
    #[serde(default)]
    pub author: String,
    /// ISO-8601 timestamp if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Post {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            author: String::new(),
            timestamp: None,
        }
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = normalize_handle(author);
        self
    }

    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Normalize a raw JSON entry.
    ///
    /// Accepts a bare string, or an object with `text` or `content`
    /// plus optional `author`/`username` and `timestamp`.
    pub fn from_json(value: &Value, index: usize) -> Result<Self, CoreError> {
        match value {
            Value::String(text) => Ok(Self::new(text)),
            Value::Object(map) => {
                let text = ["text", "content"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .ok_or(CoreError::MissingText { index })?;

                let mut post = Self::new(text);
                if let Some(author) = ["author", "username"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                {
                    post = post.with_author(author);
                }
                if let Some(ts) = map.get("timestamp").and_then(Value::as_str) {
                    post = post.with_timestamp(ts);
                }
                Ok(post)
            }
            _ => Err(CoreError::MissingText { index }),
        }
    }
}

/// Parse a batch of posts from a JSON array
pub fn parse_batch(value: &Value) -> Result<Vec<Post>, CoreError> {
    let entries = value
        .as_array()
        .ok_or_else(|| CoreError::NotASequence(json_kind(value)))?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| Post::from_json(entry, idx))
        .collect()
}

/// Parse a batch of posts from JSON text
pub fn parse_batch_str(json: &str) -> Result<Vec<Post>, CoreError> {
    let value: Value = serde_json::from_str(json)?;
    parse_batch(&value)
}

/// Lowercase a handle and strip any leading `@`
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}

/// Author reliability classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    /// Critical sources: central banks, regulators
    Tier1,
    /// Trusted analysts and media
    Tier2,
    /// Signal accounts
    Tier3,
    #[default]
    Default,
}

impl TrustTier {
    /// Weight multiplier applied to this tier's posts
    pub fn weight(&self) -> f64 {
        match self {
            Self::Tier1 => 3.0,
            Self::Tier2 => 2.0,
            Self::Tier3 => 1.5,
            Self::Default => 1.0,
        }
    }

    /// Display label; the default tier has none
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Tier1 => Some("Critical"),
            Self::Tier2 => Some("Trusted"),
            Self::Tier3 => Some("Signal"),
            Self::Default => None,
        }
    }

    /// Whether this tier marks an influencer
    pub fn is_tiered(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Weight for an optional tier; a lookup miss weighs like the default tier
pub fn tier_weight(tier: Option<TrustTier>) -> f64 {
    tier.unwrap_or_default().weight()
}
