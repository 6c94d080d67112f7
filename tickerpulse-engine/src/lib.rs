//! TickerPulse Engine
//!
//! Turns post batches into ticker verdicts:
//! - **Scorers**: keyword lexicon or an external classifier with lexicon fallback
//! - **Matchers**: decide which posts mention a ticker
//! - **Directory**: trusted accounts and their tiers
//! - **Spam**: rule-based removal of bait, promos and scams
//! - **Aggregator**: trust-weighted sentiment, dispersion and volume spikes
//!
//! ## Configuration
//!
//! Defaults live in `config/default.toml`.
//! See [`config::EngineConfig`] for loading overrides.

pub mod traits;
pub mod model;
pub mod matcher;
pub mod directory;
pub mod spam;
pub mod aggregator;
pub mod config;

pub use traits::*;
pub use model::*;
pub use matcher::*;
pub use directory::*;
pub use spam::*;
pub use aggregator::*;
pub use config::*;
