//! Command-line interface for the Concourse recommendation engine.
//!
//! Loads an amenity pool (and optionally an interaction history) from JSON
//! fixtures, runs the full pipeline once, and prints the ranked selection.
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use thiserror::Error;

use concourse_engine::{
    Amenity, CandidateSource, Engine, EngineConfig, EngineError, FetchError, HistoryStore,
    InteractionEvent, MemoryResultCache, RecommendRequest, Recommendation, SelectionContext,
    WeightsError,
};

/// Run the Concourse CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, a fixture cannot be
/// loaded, or the selection run fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    execute(&cli)
}

#[derive(Debug, Parser)]
#[command(
    name = "concourse",
    about = "Rank amenity picks for a collection, zone, and time of day",
    version
)]
struct Cli {
    /// Path to a JSON array of candidate amenities.
    #[arg(long, value_name = "path")]
    candidates: PathBuf,
    /// Collection identifier used for caching and reporting.
    #[arg(long, default_value = "amenities")]
    collection: String,
    /// Zone the caller is in, e.g. a terminal code.
    #[arg(long)]
    zone: Option<String>,
    /// Path to a JSON array of interaction events for personalisation.
    #[arg(long, value_name = "path")]
    session_history: Option<PathBuf>,
    /// Number of results to aim for.
    #[arg(long, default_value_t = 7)]
    target_count: usize,
    /// Local time to score against (e.g. 2025-06-01T07:30:00); defaults to
    /// now.
    #[arg(long)]
    at: Option<NaiveDateTime>,
    /// Omit the per-result reason strings.
    #[arg(long)]
    no_reasons: bool,
}

fn execute(cli: &Cli) -> Result<(), CliError> {
    let pool: Vec<Amenity> = load_fixture(&cli.candidates)?;
    let events: Vec<InteractionEvent> = match &cli.session_history {
        Some(path) => load_fixture(path)?,
        None => Vec::new(),
    };
    let personalised = !events.is_empty();

    let timestamp = cli
        .at
        .unwrap_or_else(|| Local::now().naive_local());
    let mut context = SelectionContext::new(timestamp);
    if let Some(zone) = &cli.zone {
        context = context.with_zone(zone.clone());
    }

    let config = EngineConfig {
        target_count: cli.target_count,
        include_reasons: !cli.no_reasons,
        ..EngineConfig::default()
    };
    let engine = Engine::with_defaults(
        FixtureSource { pool },
        FixtureHistory { events },
        MemoryResultCache::new(),
        config,
    )?;

    let mut request = RecommendRequest::new(cli.collection.clone(), context);
    if personalised {
        request = request.with_session("local");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let recommendation = runtime.block_on(engine.recommend(&request))?;
    print_selection(&recommendation);
    Ok(())
}

fn load_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadFixture {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ParseFixture {
        path: path.to_path_buf(),
        source,
    })
}

#[expect(clippy::print_stdout, reason = "the ranked selection is the CLI's output")]
fn print_selection(recommendation: &Recommendation) {
    if recommendation.results.is_empty() {
        println!("nothing to show");
        return;
    }
    for result in &recommendation.results {
        let line = render_result(
            result.rank,
            &result.amenity,
            result.breakdown.total,
            result.reason.as_deref(),
        );
        println!("{line}");
    }
    let envelope = &recommendation.envelope;
    println!(
        "({} results in {:?}, cache hit: {}, algorithm {})",
        recommendation.results.len(),
        envelope.elapsed,
        envelope.cache_hit,
        envelope.algorithm_version,
    );
}

fn render_result(rank: usize, amenity: &Amenity, total: f32, reason: Option<&str>) -> String {
    let mut line = format!(
        "{rank}. {} [{} / {}] score {total:.2}",
        amenity.name, amenity.zone, amenity.category,
    );
    if let Some(text) = reason {
        line.push_str(" - ");
        line.push_str(text);
    }
    line
}

struct FixtureSource {
    pool: Vec<Amenity>,
}

#[async_trait]
impl CandidateSource for FixtureSource {
    async fn fetch_candidates(
        &self,
        _collection: &str,
        _zone: Option<&str>,
    ) -> Result<Vec<Amenity>, FetchError> {
        Ok(self.pool.clone())
    }
}

struct FixtureHistory {
    events: Vec<InteractionEvent>,
}

#[async_trait]
impl HistoryStore for FixtureHistory {
    async fn fetch_history(
        &self,
        _session_id: &str,
        limit: usize,
    ) -> Result<Vec<InteractionEvent>, FetchError> {
        Ok(self.events.iter().take(limit).cloned().collect())
    }
}

/// Errors emitted by the Concourse CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// A fixture file could not be read.
    #[error("failed to read {path:?}")]
    ReadFixture {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A fixture file could not be parsed as JSON.
    #[error("failed to parse {path:?}")]
    ParseFixture {
        /// Path that failed to parse.
        path: PathBuf,
        /// The underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// The configured scoring weights are unusable.
    #[error(transparent)]
    Weights(#[from] WeightsError),
    /// The selection run failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn arguments_parse_with_defaults() {
        let cli = Cli::try_parse_from(["concourse", "--candidates", "pool.json"])
            .expect("minimal arguments parse");
        assert_eq!(cli.collection, "amenities");
        assert_eq!(cli.target_count, 7);
        assert!(cli.at.is_none());
        assert!(!cli.no_reasons);
    }

    #[rstest]
    fn timestamp_argument_parses() {
        let cli = Cli::try_parse_from([
            "concourse",
            "--candidates",
            "pool.json",
            "--at",
            "2025-06-01T07:30:00",
        ])
        .expect("timestamp parses");
        let at = cli.at.expect("timestamp recorded");
        assert_eq!(at.to_string(), "2025-06-01 07:30:00");
    }

    #[rstest]
    fn rendered_lines_include_rank_and_reason() {
        let venue = Amenity::new(3, "Toast Point", "Food & Dining", "T2");
        let line = render_result(1, &venue, 0.91, Some("Perfect for breakfast"));
        assert_eq!(
            line,
            "1. Toast Point [T2 / Food & Dining] score 0.91 - Perfect for breakfast"
        );
    }

    #[rstest]
    fn rendered_lines_omit_missing_reasons() {
        let venue = Amenity::new(3, "Toast Point", "Food & Dining", "T2");
        let line = render_result(2, &venue, 0.5, None);
        assert_eq!(line, "2. Toast Point [T2 / Food & Dining] score 0.50");
    }
}
