//! TickerPulse CLI
//!
//! Scores social-feed posts for trading sentiment. Results go to stdout as
//! JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tickerpulse_core::{
    extract_tickers, parse_batch_str, InMemoryVolumeHistory, LexiconScore, Post, ScoreVerdict,
    VolumeSnapshot,
};
use tickerpulse_engine::{
    Aggregator, CashtagMatcher, EngineConfig, ExtendedMatcher, FilteredBatch, NoTrust,
    SpamFilter, TrustDirectory, TrustLookup,
};

#[derive(Parser)]
#[command(name = "tickerpulse")]
#[command(author, version, about = "TickerPulse: trading sentiment for social-feed posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// Engine config file (TOML)
    #[arg(short, long, global = true, env = "TICKERPULSE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single text with the keyword lexicon
    Score {
        /// Text to score
        #[arg(short, long)]
        text: String,
    },

    /// List tickers mentioned in a text
    Tickers {
        /// Text to scan
        #[arg(short, long)]
        text: String,

        /// Also match crypto names and common bare symbols
        #[arg(long)]
        extended: bool,
    },

    /// Split a post batch into kept and removed posts
    Spam {
        /// JSON array of posts
        #[arg(short, long)]
        posts: PathBuf,

        /// Trusted account directory (JSON)
        #[arg(short, long)]
        accounts: Option<PathBuf>,

        /// Tickers whose mentions are never filtered
        #[arg(short, long, value_delimiter = ',')]
        watchlist: Vec<String>,
    },

    /// Aggregate a post batch into a verdict
    Analyze {
        /// JSON array of posts
        #[arg(short, long)]
        posts: PathBuf,

        /// Only count posts mentioning this ticker; enables volume tracking
        #[arg(short, long)]
        ticker: Option<String>,

        /// Trusted account directory (JSON)
        #[arg(short, long)]
        accounts: Option<PathBuf>,

        /// Volume history snapshot, read before and written after the run
        #[arg(long)]
        history: Option<PathBuf>,

        /// Match crypto names and common bare symbols, not just cashtags
        #[arg(long)]
        extended: bool,

        /// Drop spam before scoring
        #[arg(long)]
        filter_spam: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::embedded()?,
    };

    match cli.command {
        Commands::Score { text } => run_score(&config, &text),
        Commands::Tickers { text, extended } => run_tickers(&text, extended),
        Commands::Spam {
            posts,
            accounts,
            watchlist,
        } => run_spam(config, &posts, accounts.as_deref(), &watchlist),
        Commands::Analyze {
            posts,
            ticker,
            accounts,
            history,
            extended,
            filter_spam,
        } => run_analyze(
            &config,
            &posts,
            ticker.as_deref(),
            accounts.as_deref(),
            history.as_deref(),
            extended,
            filter_spam,
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_posts(path: &Path) -> Result<Vec<Post>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let posts = parse_batch_str(&content)
        .with_context(|| format!("invalid post batch in {}", path.display()))?;
    info!("Loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

fn load_directory(config: &EngineConfig, path: Option<&Path>) -> Result<Option<TrustDirectory>> {
    path.map(|p| {
        TrustDirectory::load(p, &config.tiers)
            .with_context(|| format!("failed to load accounts {}", p.display()))
    })
    .transpose()
}

/// A missing file is an empty history
fn load_history(path: &Path) -> Result<InMemoryVolumeHistory> {
    if !path.exists() {
        info!("No history at {}, starting fresh", path.display());
        return Ok(InMemoryVolumeHistory::new());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot: VolumeSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("invalid history in {}", path.display()))?;
    Ok(InMemoryVolumeHistory::from_snapshot(snapshot))
}

fn save_history(path: &Path, history: &InMemoryVolumeHistory) -> Result<()> {
    let json = serde_json::to_string_pretty(&history.snapshot())?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "Saved history for {} tickers to {}",
        history.ticker_count(),
        path.display()
    );
    Ok(())
}

fn run_score(config: &EngineConfig, text: &str) -> Result<()> {
    let score: LexiconScore = config.lexicon_scorer().analyze(text);
    print_json(&score)
}

fn run_tickers(text: &str, extended: bool) -> Result<()> {
    let mut tickers: Vec<String> = if extended {
        ExtendedMatcher::default().all_tickers(text).into_iter().collect()
    } else {
        extract_tickers(text).into_iter().collect()
    };
    tickers.sort();
    print_json(&tickers)
}

#[derive(Serialize)]
struct SpamReport<'a> {
    kept: &'a [Post],
    removed: Vec<RemovedEntry<'a>>,
}

#[derive(Serialize)]
struct RemovedEntry<'a> {
    post: &'a Post,
    reason: String,
}

impl<'a> From<&'a FilteredBatch> for SpamReport<'a> {
    fn from(batch: &'a FilteredBatch) -> Self {
        Self {
            kept: &batch.kept,
            removed: batch
                .removed
                .iter()
                .map(|r| RemovedEntry {
                    post: &r.post,
                    reason: r.reason.to_string(),
                })
                .collect(),
        }
    }
}

fn run_spam(
    mut config: EngineConfig,
    posts: &Path,
    accounts: Option<&Path>,
    watchlist: &[String],
) -> Result<()> {
    let posts = load_posts(posts)?;
    let directory = load_directory(&config, accounts)?;

    config.spam.watchlist.extend(watchlist.iter().cloned());
    let filter = SpamFilter::new(config.spam);

    let trust: &dyn TrustLookup = match &directory {
        Some(directory) => directory,
        None => &NoTrust,
    };
    let batch = filter.filter_batch(&posts, trust);

    print_json(&SpamReport::from(&batch))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport {
    ticker: Option<String>,
    scorer: String,
    spam_removed: usize,
    #[serde(flatten)]
    verdict: ScoreVerdict,
}

fn run_analyze(
    config: &EngineConfig,
    posts: &Path,
    ticker: Option<&str>,
    accounts: Option<&Path>,
    history_path: Option<&Path>,
    extended: bool,
    filter_spam: bool,
) -> Result<()> {
    let mut posts = load_posts(posts)?;
    let directory = load_directory(config, accounts)?;
    let trust: &dyn TrustLookup = match &directory {
        Some(directory) => directory,
        None => &NoTrust,
    };

    let mut spam_removed = 0;
    if filter_spam {
        let batch = SpamFilter::new(config.spam.clone()).filter_batch(&posts, trust);
        spam_removed = batch.removed.len();
        posts = batch.kept;
    }

    let history = Arc::new(match history_path {
        Some(path) => load_history(path)?,
        None => InMemoryVolumeHistory::new(),
    });

    // no model backend ships with the CLI
    let aggregator = Aggregator::with_config(
        config.aggregator_config(),
        config.build_scorer(None),
        history.clone(),
    );

    let verdict = match ticker {
        Some(ticker) if extended => {
            aggregator.analyze_mentions(&posts, ticker, &ExtendedMatcher::default(), trust)
        }
        Some(ticker) => aggregator.analyze_mentions(&posts, ticker, &CashtagMatcher, trust),
        None => aggregator.analyze_ticker(&posts, None, trust),
    };

    info!(
        "{}: {} over {} posts",
        ticker.unwrap_or("batch"),
        verdict.status,
        verdict.sample_size
    );

    if let Some(path) = history_path {
        save_history(path, &history)?;
    }

    print_json(&AnalyzeReport {
        ticker: ticker.map(str::to_string),
        scorer: aggregator.scorer().name().to_string(),
        spam_removed,
        verdict,
    })
}
