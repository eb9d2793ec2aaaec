//! Scoring weights and per-candidate score breakdowns.
//!
//! Component scores live in `0.0..=1.0`. Anything non-finite is replaced
//! with the neutral [`NEUTRAL_SCORE`] before weighting so a single bad
//! input can never poison a whole batch.

use thiserror::Error;

/// Neutral component score used when no information is available.
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Relative weighting of the four scoring dimensions.
///
/// # Examples
/// ```
/// use concourse_core::ScoringWeights;
///
/// let weights = ScoringWeights::default().validate()?;
/// assert_eq!(weights.time, 0.3);
/// # Ok::<(), concourse_core::WeightsError>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringWeights {
    /// Multiplier applied to time relevance.
    pub time: f32,
    /// Multiplier applied to physical proximity.
    pub proximity: f32,
    /// Multiplier applied to personalised preference relevance.
    pub preference: f32,
    /// Multiplier applied to the structural diversity dimension.
    pub diversity: f32,
}

impl ScoringWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when any weight is non-finite or negative,
    /// or when the total weight is zero.
    pub const fn validate(self) -> Result<Self, WeightsError> {
        if self.is_valid() { Ok(self) } else { Err(WeightsError) }
    }

    const fn is_valid(self) -> bool {
        self.has_finite_values() && self.has_non_negative_values() && self.has_non_zero_total()
    }

    const fn has_finite_values(self) -> bool {
        self.time.is_finite()
            && self.proximity.is_finite()
            && self.preference.is_finite()
            && self.diversity.is_finite()
    }

    const fn has_non_negative_values(self) -> bool {
        self.time >= 0.0_f32
            && self.proximity >= 0.0_f32
            && self.preference >= 0.0_f32
            && self.diversity >= 0.0_f32
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to ensure a non-zero total"
    )]
    const fn has_non_zero_total(self) -> bool {
        (self.time + self.proximity + self.preference + self.diversity) != 0.0_f32
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            time: 0.3_f32,
            proximity: 0.25_f32,
            preference: 0.25_f32,
            diversity: 0.2_f32,
        }
    }
}

/// Error raised when a weight configuration is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("scoring weights must be finite, non-negative, and sum to a positive total")]
pub struct WeightsError;

/// The four component scores and their weighted total for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// Time relevance in `0.0..=1.0`.
    pub time: f32,
    /// Proximity relevance in `0.0..=1.0`.
    pub proximity: f32,
    /// Preference relevance in `0.0..=1.0`.
    pub preference: f32,
    /// Diversity placeholder, neutral at scoring time.
    pub diversity: f32,
    /// Weighted total, clamped to `0.0..=1.0`.
    pub total: f32,
}

impl ScoreBreakdown {
    /// Combine sanitised component scores into a weighted breakdown.
    ///
    /// Each component is clamped into `0.0..=1.0` (non-finite values become
    /// neutral) before weighting, and the total is clamped again after.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "combining component scores requires a weighted sum"
    )]
    pub fn from_components(
        time: f32,
        proximity: f32,
        preference: f32,
        diversity: f32,
        weights: &ScoringWeights,
    ) -> Self {
        let time_score = sanitise(time);
        let proximity_score = sanitise(proximity);
        let preference_score = sanitise(preference);
        let diversity_score = sanitise(diversity);
        let total = (time_score * weights.time
            + proximity_score * weights.proximity
            + preference_score * weights.preference
            + diversity_score * weights.diversity)
            .clamp(0.0_f32, 1.0_f32);
        Self {
            time: time_score,
            proximity: proximity_score,
            preference: preference_score,
            diversity: diversity_score,
            total,
        }
    }

    /// Breakdown with every dimension neutral.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            time: NEUTRAL_SCORE,
            proximity: NEUTRAL_SCORE,
            preference: NEUTRAL_SCORE,
            diversity: NEUTRAL_SCORE,
            total: NEUTRAL_SCORE,
        }
    }

    /// Breakdown with every dimension maximal, used by the small-pool
    /// shortcut where there is no real choice to make.
    #[must_use]
    pub const fn maximal() -> Self {
        Self {
            time: 1.0,
            proximity: 1.0,
            preference: 1.0,
            diversity: 1.0,
            total: 1.0,
        }
    }
}

/// Clamp a raw component score into `0.0..=1.0`, mapping non-finite values
/// to [`NEUTRAL_SCORE`].
pub(crate) fn sanitise(score: f32) -> f32 {
    if !score.is_finite() {
        return NEUTRAL_SCORE;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_weights_match_canonical_split() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.time, 0.3_f32);
        assert_eq!(weights.proximity, 0.25_f32);
        assert_eq!(weights.preference, 0.25_f32);
        assert_eq!(weights.diversity, 0.2_f32);
    }

    #[rstest]
    fn zero_total_is_rejected() {
        let weights = ScoringWeights {
            time: 0.0,
            proximity: 0.0,
            preference: 0.0,
            diversity: 0.0,
        };
        assert_eq!(weights.validate(), Err(WeightsError));
    }

    #[rstest]
    fn negative_weight_is_rejected() {
        let weights = ScoringWeights {
            time: -0.1,
            ..ScoringWeights::default()
        };
        assert_eq!(weights.validate(), Err(WeightsError));
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn components_are_clamped_before_weighting() {
        let weights = ScoringWeights::default();
        let breakdown = ScoreBreakdown::from_components(2.0, -1.0, f32::NAN, 0.5, &weights);
        assert_eq!(breakdown.time, 1.0);
        assert_eq!(breakdown.proximity, 0.0);
        assert_eq!(breakdown.preference, NEUTRAL_SCORE);
        let expected = 0.3_f32 + 0.25_f32 * NEUTRAL_SCORE + 0.2_f32 * 0.5_f32;
        assert!((breakdown.total - expected).abs() < 0.000_1_f32);
    }

    #[rstest]
    fn total_never_exceeds_one() {
        let weights = ScoringWeights {
            time: 2.0,
            proximity: 2.0,
            preference: 2.0,
            diversity: 2.0,
        };
        let breakdown = ScoreBreakdown::from_components(1.0, 1.0, 1.0, 1.0, &weights);
        assert_eq!(breakdown.total, 1.0);
    }
}
