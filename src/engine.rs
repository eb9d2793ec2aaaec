//! Async orchestration of the selection pipeline.
//!
//! One call to [`Engine::recommend`] runs fetch → aggregate → score →
//! select → cache. Candidate and history fetches fan out in parallel under
//! a shared deadline; scoring and selection are pure and synchronous.
//! Refreshes follow last-start-wins: each run takes a per-key generation
//! ticket, and a run whose ticket has been superseded still answers its own
//! caller but skips the cache write.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use concourse_core::{
    Amenity, CandidateSource, ContextSnapshot, DiversityRules, FetchError, HistoryStore,
    InteractionEvent, PreferenceSignals, ResultCache, ScoreBreakdown, ScoredCandidate, Scorer,
    ScoringWeights, SelectionContext, SelectionKey, SelectionResult, Selector, WeightsError,
};
use concourse_scorer::{PreferenceAggregator, ScoringEngine};
use concourse_selector::{DiversitySelector, explain};

/// Version tag reported in every performance envelope.
pub const ALGORITHM_VERSION: &str = "1.0";

/// Tunable knobs for the engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Number of results to aim for.
    pub target_count: usize,
    /// Whether to attach a reason string to each result.
    pub include_reasons: bool,
    /// Scoring weights, validated at the start of each run.
    pub weights: ScoringWeights,
    /// Diversity caps for the selector.
    pub diversity_rules: DiversityRules,
    /// Deadline applied to each external fetch.
    pub fetch_timeout: Duration,
    /// How long a cached shortlist stays fresh.
    pub cache_ttl: Duration,
    /// Number of recent interaction events requested per session.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_count: 7,
            include_reasons: true,
            weights: ScoringWeights::default(),
            diversity_rules: DiversityRules::recommended(),
            fetch_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
            history_limit: 100,
        }
    }
}

/// One selection request.
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    /// Collection to select from.
    pub collection: String,
    /// Session identifier for personalisation, when available.
    pub session: Option<String>,
    /// Situation the selection is for.
    pub context: SelectionContext,
    /// Bypass and invalidate the cache for this key before running.
    pub refresh: bool,
}

impl RecommendRequest {
    /// Build an anonymous, cache-friendly request.
    #[must_use]
    pub fn new(collection: impl Into<String>, context: SelectionContext) -> Self {
        Self {
            collection: collection.into(),
            session: None,
            context,
            refresh: false,
        }
    }

    /// Attach a session identifier for personalised scoring.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Request a forced refresh.
    #[must_use]
    pub const fn refreshed(mut self) -> Self {
        self.refresh = true;
        self
    }
}

/// Observability data for one completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceEnvelope {
    /// Wall time the call took.
    pub elapsed: Duration,
    /// Whether the results came from the cache.
    pub cache_hit: bool,
    /// Version of the selection algorithm that produced the results.
    pub algorithm_version: &'static str,
}

/// The ordered shortlist plus its performance envelope.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Results in rank order; may be shorter than the target, or empty.
    pub results: Vec<SelectionResult>,
    /// Observability data for the call.
    pub envelope: PerformanceEnvelope,
}

/// Failures surfaced to the caller.
///
/// Everything else (history fetch failure, cache unavailability,
/// superseded runs) degrades gracefully and is observable only in logs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The candidate pool could not be fetched and no cached shortlist,
    /// fresh or stale, was available to fall back on.
    #[error("candidate fetch for '{collection}' failed")]
    CandidateFetch {
        /// Collection whose fetch failed.
        collection: String,
        /// The underlying store failure.
        #[source]
        source: FetchError,
    },
}

/// The orchestrator.
///
/// Generic over its collaborators so tests can substitute in-memory fakes;
/// [`Engine::with_defaults`] wires up the standard scorer and selector.
///
/// Scoring weights are validated twice: at construction for the standard
/// wiring, and again at the start of every run. A run that finds its
/// configured weights unusable degrades to a deterministic featured-first
/// selection rather than failing the caller.
pub struct Engine<S, H, C, K = ScoringEngine, L = DiversitySelector> {
    source: S,
    history: H,
    cache: C,
    scorer: K,
    selector: L,
    aggregator: PreferenceAggregator,
    config: EngineConfig,
    generations: Mutex<HashMap<SelectionKey, u64>>,
}

impl<S, H, C> Engine<S, H, C>
where
    S: CandidateSource,
    H: HistoryStore,
    C: ResultCache,
{
    /// Build an engine with the standard scorer and selector.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the configured weights are unusable.
    pub fn with_defaults(
        source: S,
        history: H,
        cache: C,
        config: EngineConfig,
    ) -> Result<Self, WeightsError> {
        let scorer = ScoringEngine::new(config.weights)?;
        Ok(Self::new(
            source,
            history,
            cache,
            scorer,
            DiversitySelector,
            config,
        ))
    }
}

impl<S, H, C, K, L> Engine<S, H, C, K, L>
where
    S: CandidateSource,
    H: HistoryStore,
    C: ResultCache,
    K: Scorer,
    L: Selector,
{
    /// Assemble an engine from explicit collaborators.
    #[must_use]
    pub fn new(source: S, history: H, cache: C, scorer: K, selector: L, config: EngineConfig) -> Self {
        Self {
            source,
            history,
            cache,
            scorer,
            selector,
            aggregator: PreferenceAggregator::default(),
            config,
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the preference aggregator.
    #[must_use]
    pub fn with_aggregator(mut self, aggregator: PreferenceAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// The configuration in force.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produce an ordered shortlist for the request.
    ///
    /// An empty candidate pool is a valid empty result, not an error.
    ///
    /// # Errors
    /// Returns [`EngineError::CandidateFetch`] when the candidate pool
    /// cannot be fetched and no cached shortlist exists for the key.
    pub async fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<Recommendation, EngineError> {
        let started = Instant::now();
        let zone = request.context.zone.as_deref();
        let key = SelectionKey::new(request.collection.clone(), zone);

        if request.refresh {
            if let Err(err) = self.cache.delete(&key) {
                log::warn!("cache invalidation failed for {key:?}: {err}");
            }
        } else if let Some(results) = self.read_fresh(&key) {
            return Ok(Recommendation {
                results,
                envelope: envelope(started, true),
            });
        }

        let generation = self.begin_run(&key);

        let candidate_fetch = tokio::time::timeout(
            self.config.fetch_timeout,
            self.source.fetch_candidates(&request.collection, zone),
        );
        let (fetched, events) =
            tokio::join!(candidate_fetch, self.fetch_history(request.session.as_deref()));

        let candidates = match fetched {
            Ok(Ok(pool)) => pool,
            Ok(Err(err)) => return self.recover(&key, started, &request.collection, err),
            Err(_) => {
                let elapsed_ms =
                    u64::try_from(self.config.fetch_timeout.as_millis()).unwrap_or(u64::MAX);
                return self.recover(
                    &key,
                    started,
                    &request.collection,
                    FetchError::Timeout { elapsed_ms },
                );
            }
        };

        let signals = events.map(|history| self.aggregator.aggregate(&history, &candidates));
        let results = self.run_pipeline(candidates, signals.as_ref(), &request.context);

        if self.is_current(&key, generation) {
            if let Err(err) = self
                .cache
                .set(&key, results.clone(), self.config.cache_ttl)
            {
                log::warn!("cache write failed for {key:?}: {err}");
            }
        } else {
            log::debug!("run superseded for {key:?}; skipping cache write");
        }

        Ok(Recommendation {
            results,
            envelope: envelope(started, false),
        })
    }

    /// Fresh-only cache read; stale entries and cache failures read as a
    /// miss.
    fn read_fresh(&self, key: &SelectionKey) -> Option<Vec<SelectionResult>> {
        match self.cache.get(key) {
            Ok(Some(entry)) if entry.is_fresh(Instant::now()) => Some(entry.results),
            Ok(_) => None,
            Err(err) => {
                log::warn!("cache read failed for {key:?}: {err}");
                None
            }
        }
    }

    /// Serve the last cached shortlist, stale included, when the candidate
    /// fetch fails; surface the fetch error only with nothing to fall back
    /// on.
    fn recover(
        &self,
        key: &SelectionKey,
        started: Instant,
        collection: &str,
        source: FetchError,
    ) -> Result<Recommendation, EngineError> {
        log::warn!("candidate fetch failed for {key:?}, trying cached results: {source}");
        if let Ok(Some(entry)) = self.cache.get(key) {
            return Ok(Recommendation {
                results: entry.results,
                envelope: envelope(started, true),
            });
        }
        Err(EngineError::CandidateFetch {
            collection: collection.to_owned(),
            source,
        })
    }

    /// Fetch interaction history, degrading to `None` on any failure so
    /// the run proceeds with neutral preference scoring.
    async fn fetch_history(&self, session: Option<&str>) -> Option<Vec<InteractionEvent>> {
        let session_id = session?;
        let fetch = self
            .history
            .fetch_history(session_id, self.config.history_limit);
        match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(Ok(events)) => Some(events),
            Ok(Err(err)) => {
                log::warn!("history fetch failed; scoring without preferences: {err}");
                None
            }
            Err(_) => {
                log::warn!("history fetch timed out; scoring without preferences");
                None
            }
        }
    }

    /// Score, select, and annotate. Unusable weights degrade to the
    /// deterministic priority fallback instead of failing the run.
    fn run_pipeline(
        &self,
        candidates: Vec<Amenity>,
        signals: Option<&PreferenceSignals>,
        context: &SelectionContext,
    ) -> Vec<SelectionResult> {
        let Ok(weights) = self.config.weights.validate() else {
            log::error!("unusable scoring weights; degrading to priority selection");
            return self.fallback_selection(candidates, context);
        };
        let snapshot = ContextSnapshot::capture(context, &weights);
        let scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|amenity| {
                let breakdown = self.scorer.score(&amenity, context, signals);
                ScoredCandidate { amenity, breakdown }
            })
            .collect();
        let mut results = self.selector.select(
            scored,
            self.config.target_count,
            &self.config.diversity_rules,
            &snapshot,
        );
        if self.config.include_reasons {
            for result in &mut results {
                result.reason = Some(explain(&result.amenity, &result.breakdown, context));
            }
        }
        results
    }

    /// Deterministic last-resort selection: featured first, then id.
    fn fallback_selection(
        &self,
        candidates: Vec<Amenity>,
        context: &SelectionContext,
    ) -> Vec<SelectionResult> {
        let snapshot = ContextSnapshot::capture(context, &self.config.weights);
        let mut pool = candidates;
        pool.sort_by(|a, b| b.featured.cmp(&a.featured).then_with(|| a.id.cmp(&b.id)));
        pool.truncate(self.config.target_count);
        pool.into_iter()
            .enumerate()
            .map(|(index, amenity)| SelectionResult {
                amenity,
                breakdown: ScoreBreakdown::neutral(),
                rank: index + 1,
                reason: None,
                context: snapshot.clone(),
            })
            .collect()
    }

    /// Take a generation ticket for the key.
    fn begin_run(&self, key: &SelectionKey) -> u64 {
        let mut generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let counter = generations.entry(key.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Whether the ticket is still the latest for the key.
    fn is_current(&self, key: &SelectionKey, generation: u64) -> bool {
        let generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        generations.get(key).copied() == Some(generation)
    }
}

fn envelope(started: Instant, cache_hit: bool) -> PerformanceEnvelope {
    PerformanceEnvelope {
        elapsed: started.elapsed(),
        cache_hit,
        algorithm_version: ALGORITHM_VERSION,
    }
}
