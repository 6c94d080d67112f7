//! Per-ticker volume history
//!
//! Every scored batch for a ticker leaves a `(count, timestamp)` entry:
//! - Entries older than the retention window are pruned on every write
//! - Prior entries feed volume-spike detection
//! - Stores are injected so scoring never depends on persistence

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{MIN_VOLUME_HISTORY, VOLUME_SPIKE_MULTIPLIER};

/// One observed batch size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

impl VolumeEntry {
    pub fn new(count: usize, timestamp: DateTime<Utc>) -> Self {
        Self { count, timestamp }
    }

    /// Whether this entry is still inside `window` as of `now`
    pub fn is_live(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.timestamp > now - window
    }
}

/// Storage for per-ticker volume history
pub trait VolumeHistoryStore: Send + Sync {
    /// Entries currently held for a ticker, oldest first
    fn get(&self, ticker: &str) -> Vec<VolumeEntry>;

    /// Append an entry for a ticker
    fn append(&self, ticker: &str, entry: VolumeEntry);

    /// Drop entries that fell out of `window` relative to `now`
    fn prune(&self, ticker: &str, window: Duration, now: DateTime<Utc>);

    /// Record a new entry and return the prior entries still in the window.
    ///
    /// The default composes `prune`, `get` and `append`; stores shared
    /// across threads should override it to run as one step.
    fn record(&self, ticker: &str, entry: VolumeEntry, window: Duration) -> Vec<VolumeEntry> {
        self.prune(ticker, window, entry.timestamp);
        let prior = self.get(ticker);
        self.append(ticker, entry);
        prior
    }
}

/// Whether `current` is a spike against `prior` batch sizes
pub fn is_volume_spike(prior: &[VolumeEntry], current: usize) -> bool {
    if prior.len() < MIN_VOLUME_HISTORY {
        return false;
    }

    let total: usize = prior.iter().map(|e| e.count).sum();
    let avg = total as f64 / prior.len() as f64;
    current as f64 > avg * VOLUME_SPIKE_MULTIPLIER
}

/// Serializable copy of a store's contents
pub type VolumeSnapshot = HashMap<String, Vec<VolumeEntry>>;

/// Thread-safe in-memory history store
#[derive(Debug, Default)]
pub struct InMemoryVolumeHistory {
    entries: DashMap<String, Vec<VolumeEntry>>,
}

impl InMemoryVolumeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot
    pub fn from_snapshot(snapshot: VolumeSnapshot) -> Self {
        let entries = DashMap::new();
        for (ticker, mut history) in snapshot {
            history.sort_by_key(|e| e.timestamp);
            entries.insert(ticker, history);
        }
        Self { entries }
    }

    /// Copy out every ticker's history
    pub fn snapshot(&self) -> VolumeSnapshot {
        self.entries
            .iter()
            .map(|item| (item.key().clone(), item.value().clone()))
            .collect()
    }

    /// Number of tickers tracked
    pub fn ticker_count(&self) -> usize {
        self.entries.len()
    }

    /// Clear all history (for testing)
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl VolumeHistoryStore for InMemoryVolumeHistory {
    fn get(&self, ticker: &str) -> Vec<VolumeEntry> {
        self.entries
            .get(ticker)
            .map(|h| h.value().clone())
            .unwrap_or_default()
    }

    fn append(&self, ticker: &str, entry: VolumeEntry) {
        self.entries.entry(ticker.to_string()).or_default().push(entry);
    }

    fn prune(&self, ticker: &str, window: Duration, now: DateTime<Utc>) {
        if let Some(mut history) = self.entries.get_mut(ticker) {
            history.retain(|e| e.is_live(now, window));
        }
    }

    fn record(&self, ticker: &str, entry: VolumeEntry, window: Duration) -> Vec<VolumeEntry> {
        // the entry guard holds the shard lock for the whole read-modify-write
        let mut history = self.entries.entry(ticker.to_string()).or_default();
        history.retain(|e| e.is_live(entry.timestamp, window));
        let prior = history.clone();
        history.push(entry);
        prior
    }
}
