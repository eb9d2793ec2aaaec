//! Four-factor scoring for the Concourse recommendation engine.
//!
//! [`ScoringEngine`] combines time relevance, zone proximity, and
//! personalised preference relevance into a weighted [`ScoreBreakdown`]
//! for each candidate. Diversity stays neutral here: it is a property of
//! the selected set and is enforced by the selector, not by score.
//! [`PreferenceAggregator`] distils raw interaction history into the
//! preference signals the engine consumes.

#![forbid(unsafe_code)]

mod aggregate;
mod preference;
mod proximity;
mod time;

pub use aggregate::PreferenceAggregator;
pub use proximity::{ProximityScores, ZoneAdjacency, ZoneDistance};

use concourse_core::{
    Amenity, NEUTRAL_SCORE, PreferenceSignals, ScoreBreakdown, Scorer, ScoringWeights,
    SelectionContext, WeightsError,
};

/// The standard [`Scorer`] implementation.
///
/// Scoring is pure and per-item: no state is shared between candidates, so
/// a batch may be scored in any order (or in parallel) with identical
/// results.
///
/// # Examples
/// ```
/// use concourse_core::{Amenity, Scorer, ScoringWeights, SelectionContext};
/// use concourse_scorer::ScoringEngine;
///
/// let engine = ScoringEngine::new(ScoringWeights::default())?;
/// let amenity = Amenity::new(1, "Noodle Bar", "Food & Dining", "T1");
/// let context = SelectionContext::new(chrono::NaiveDateTime::default());
/// let breakdown = engine.score(&amenity, &context, None);
/// assert!(breakdown.total <= 1.0);
/// # Ok::<(), concourse_core::WeightsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    adjacency: ZoneAdjacency,
    proximity: ProximityScores,
}

impl ScoringEngine {
    /// Build an engine with validated weights and no adjacency knowledge.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights are non-finite, negative,
    /// or sum to zero.
    pub fn new(weights: ScoringWeights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validate()?,
            adjacency: ZoneAdjacency::default(),
            proximity: ProximityScores::default(),
        })
    }

    /// Replace the zone-adjacency table.
    #[must_use]
    pub fn with_adjacency(mut self, adjacency: ZoneAdjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Replace the proximity score levels.
    #[must_use]
    pub const fn with_proximity_scores(mut self, proximity: ProximityScores) -> Self {
        self.proximity = proximity;
        self
    }

    /// The weights in force.
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            adjacency: ZoneAdjacency::default(),
            proximity: ProximityScores::default(),
        }
    }
}

impl Scorer for ScoringEngine {
    fn score(
        &self,
        amenity: &Amenity,
        context: &SelectionContext,
        signals: Option<&PreferenceSignals>,
    ) -> ScoreBreakdown {
        let hour = context.hour();
        let time = time::time_relevance(amenity, hour);
        let proximity = proximity::proximity_relevance(
            &self.adjacency,
            &self.proximity,
            context.zone.as_deref(),
            &amenity.zone,
        );
        let preference = signals.map_or(NEUTRAL_SCORE, |derived| {
            preference::preference_relevance(amenity, derived)
        });
        ScoreBreakdown::from_components(time, proximity, preference, NEUTRAL_SCORE, &self.weights)
    }
}
