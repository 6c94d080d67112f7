//! Trusted account directory
//!
//! Builds the read-only handle → tier table from an account directory
//! document (`{"accounts": {"Category": ["@handle", ...]}}`). Which
//! categories map to which tier is a [`TierPolicy`], loaded from config.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

use tickerpulse_core::{normalize_handle, TrustTier};

use crate::{EngineError, TrustLookup};

/// Account directory document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsDocument {
    #[serde(default)]
    pub metadata: Option<AccountsMetadata>,
    #[serde(default)]
    pub accounts: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsMetadata {
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Category → tier policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    pub tier1: Vec<String>,
    pub tier2: Vec<String>,
    pub tier3: Vec<String>,
    /// Tier for categories not listed anywhere
    pub unlisted: TrustTier,
}

impl Default for TierPolicy {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            tier1: owned(&["Macro_CentralBanks", "Regulatory_Government"]),
            tier2: owned(&["Institutional_AssetMgmt", "Media_News", "Wealth_ValueInvesting"]),
            tier3: owned(&["Trading_TechnicalAnalysis", "Crypto_DeFi", "Forex", "Commodities"]),
            unlisted: TrustTier::Tier3,
        }
    }
}

impl TierPolicy {
    /// Tier assigned to every handle in `category`
    pub fn tier_for_category(&self, category: &str) -> TrustTier {
        let listed = |list: &[String]| list.iter().any(|c| c == category);
        if listed(&self.tier1) {
            TrustTier::Tier1
        } else if listed(&self.tier2) {
            TrustTier::Tier2
        } else if listed(&self.tier3) {
            TrustTier::Tier3
        } else {
            self.unlisted
        }
    }
}

/// Display info for a tiered author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerInfo {
    pub tier: TrustTier,
    pub weight: f64,
    pub label: &'static str,
}

/// Handle → tier table
#[derive(Debug, Clone, Default)]
pub struct TrustDirectory {
    tiers: HashMap<String, TrustTier>,
}

impl TrustDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed document.
    ///
    /// A handle listed under several categories keeps its strongest tier.
    pub fn from_document(doc: &AccountsDocument, policy: &TierPolicy) -> Self {
        let mut directory = Self::new();

        for (category, handles) in &doc.accounts {
            let tier = policy.tier_for_category(category);
            for handle in handles {
                directory.insert(handle, tier);
            }
        }

        info!(
            "Loaded {} trusted accounts across {} categories",
            directory.len(),
            doc.accounts.len()
        );
        directory
    }

    /// Build from JSON text
    pub fn from_json_str(json: &str, policy: &TierPolicy) -> Result<Self, EngineError> {
        let doc: AccountsDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc, policy))
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P, policy: &TierPolicy) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, policy)
    }

    /// Register a handle, keeping the stronger tier on conflict
    pub fn insert(&mut self, handle: &str, tier: TrustTier) {
        let handle = normalize_handle(handle);
        if handle.is_empty() {
            return;
        }

        self.tiers
            .entry(handle)
            .and_modify(|existing| {
                if tier.weight() > existing.weight() {
                    *existing = tier;
                }
            })
            .or_insert(tier);
    }

    /// Tier info for display; `None` for unknown or default-tier authors
    pub fn influencer_info(&self, author: &str) -> Option<InfluencerInfo> {
        let tier = self.tier_for(author)?;
        let label = tier.label()?;
        Some(InfluencerInfo {
            tier,
            weight: tier.weight(),
            label,
        })
    }

    /// Whether the author is listed at all
    pub fn is_trusted(&self, author: &str) -> bool {
        self.tiers.contains_key(&normalize_handle(author))
    }

    /// Handles assigned to a tier
    pub fn handles_in(&self, tier: TrustTier) -> Vec<&str> {
        let mut handles: Vec<&str> = self
            .tiers
            .iter()
            .filter(|(_, t)| **t == tier)
            .map(|(h, _)| h.as_str())
            .collect();
        handles.sort_unstable();
        handles
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl TrustLookup for TrustDirectory {
    fn tier_for(&self, author: &str) -> Option<TrustTier> {
        self.tiers.get(&normalize_handle(author)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNTS: &str = r#"{
        "metadata": {"total_count": 6, "version": "2"},
        "accounts": {
            "Macro_CentralBanks": ["@federalreserve", "@ecb"],
            "Media_News": ["@Reuters", "@ecb"],
            "Crypto_DeFi": ["@VitalikButerin"],
            "Memes": ["@someone"]
        }
    }"#;

    #[test]
    fn test_default_policy() {
        let policy = TierPolicy::default();
        assert_eq!(policy.tier_for_category("Regulatory_Government"), TrustTier::Tier1);
        assert_eq!(policy.tier_for_category("Media_News"), TrustTier::Tier2);
        assert_eq!(policy.tier_for_category("Forex"), TrustTier::Tier3);
        assert_eq!(policy.tier_for_category("Anything_Else"), TrustTier::Tier3);
    }

    #[test]
    fn test_from_json() {
        let directory = TrustDirectory::from_json_str(ACCOUNTS, &TierPolicy::default()).unwrap();

        assert_eq!(directory.len(), 5);
        assert_eq!(directory.tier_for("FederalReserve"), Some(TrustTier::Tier1));
        assert_eq!(directory.tier_for("@reuters"), Some(TrustTier::Tier2));
        assert_eq!(directory.tier_for("vitalikbuterin"), Some(TrustTier::Tier3));
        assert_eq!(directory.tier_for("someone"), Some(TrustTier::Tier3));
        assert_eq!(directory.tier_for("nobody"), None);
    }

    #[test]
    fn test_strongest_tier_wins() {
        let directory = TrustDirectory::from_json_str(ACCOUNTS, &TierPolicy::default()).unwrap();
        assert_eq!(directory.tier_for("ecb"), Some(TrustTier::Tier1));
    }

    #[test]
    fn test_custom_policy() {
        let policy = TierPolicy {
            tier1: vec!["Crypto_DeFi".to_string()],
            tier2: Vec::new(),
            tier3: Vec::new(),
            unlisted: TrustTier::Default,
        };
        let directory = TrustDirectory::from_json_str(ACCOUNTS, &policy).unwrap();
        assert_eq!(directory.tier_for("vitalikbuterin"), Some(TrustTier::Tier1));
        assert_eq!(directory.tier_for("reuters"), Some(TrustTier::Default));
        assert!(directory.influencer_info("reuters").is_none());
    }

    #[test]
    fn test_influencer_info() {
        let mut directory = TrustDirectory::new();
        directory.insert("@CryptoCapo", TrustTier::Tier3);

        let info = directory.influencer_info("cryptocapo").unwrap();
        assert_eq!(info.label, "Signal");
        assert_eq!(info.weight, 1.5);
        assert!(directory.is_trusted("@CRYPTOCAPO"));
        assert_eq!(directory.handles_in(TrustTier::Tier3), vec!["cryptocapo"]);
    }
}
