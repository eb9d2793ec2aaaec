//! Facade crate for the Concourse recommendation engine.
//!
//! This crate re-exports the core domain types, the scoring and selection
//! implementations, and exposes the async [`Engine`] orchestrator with its
//! in-memory short-TTL result cache.

#![forbid(unsafe_code)]

mod cache;
mod engine;

pub use cache::MemoryResultCache;
pub use concourse_core::{
    Amenity, CacheError, CachedSelection, CandidateSource, ContextSnapshot, DiversityRules,
    EngagementPattern, FetchError, HistoryStore, InteractionEvent, InteractionKind, MealWindow,
    NEUTRAL_SCORE, PreferenceSignals, PriceTier, ResultCache, Schedule, ScoreBreakdown,
    ScoredCandidate, Scorer, ScoringWeights, SelectionContext, SelectionKey, SelectionResult,
    Selector, WeightsError,
};
pub use concourse_scorer::{
    PreferenceAggregator, ProximityScores, ScoringEngine, ZoneAdjacency, ZoneDistance,
};
pub use concourse_selector::{DiversitySelector, explain};
pub use engine::{
    ALGORITHM_VERSION, Engine, EngineConfig, EngineError, PerformanceEnvelope, Recommendation,
    RecommendRequest,
};
