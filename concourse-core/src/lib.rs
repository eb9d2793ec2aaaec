//! Core domain types for the Concourse recommendation engine.
//!
//! The crate defines the immutable candidate snapshot ([`Amenity`]), the
//! per-run [`SelectionContext`], derived [`PreferenceSignals`], the scoring
//! and selection traits ([`Scorer`], [`Selector`]), and the boundary traits
//! for the external candidate, history, and cache stores. Constructors
//! validate where invalid input would poison a whole run and stay
//! infallible elsewhere.

#![forbid(unsafe_code)]

mod amenity;
mod context;
mod schedule;
mod score;
mod scorer;
mod selection;
mod signals;
mod store;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use amenity::{Amenity, PriceTier, PriceTierParseError};
pub use context::SelectionContext;
pub use schedule::{MealWindow, Schedule, hour_within};
pub use score::{NEUTRAL_SCORE, ScoreBreakdown, ScoringWeights, WeightsError};
pub use scorer::Scorer;
pub use selection::{ContextSnapshot, DiversityRules, ScoredCandidate, SelectionResult, Selector};
pub use signals::{EngagementPattern, InteractionEvent, InteractionKind, PreferenceSignals};
pub use store::{
    CacheError, CachedSelection, CandidateSource, FetchError, HistoryStore, ResultCache,
    SelectionKey,
};
