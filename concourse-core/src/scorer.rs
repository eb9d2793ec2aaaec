//! The scoring seam between candidate data and selection.

use crate::{Amenity, PreferenceSignals, ScoreBreakdown, SelectionContext, score::sanitise};

/// Produces a [`ScoreBreakdown`] for one candidate in one context.
///
/// Implementations must be pure: the same amenity, context, and signals
/// always yield the same breakdown. Signals are optional because anonymous
/// sessions carry no history.
///
/// # Examples
/// ```
/// use concourse_core::{
///     Amenity, PreferenceSignals, ScoreBreakdown, Scorer, SelectionContext,
/// };
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(
///         &self,
///         _amenity: &Amenity,
///         _context: &SelectionContext,
///         _signals: Option<&PreferenceSignals>,
///     ) -> ScoreBreakdown {
///         ScoreBreakdown::maximal()
///     }
/// }
///
/// let amenity = Amenity::new(1, "Kiosk", "Retail", "T1");
/// let context = SelectionContext::new(chrono::NaiveDateTime::default());
/// assert_eq!(UnitScorer.score(&amenity, &context, None).total, 1.0);
/// ```
pub trait Scorer {
    /// Score a single candidate.
    fn score(
        &self,
        amenity: &Amenity,
        context: &SelectionContext,
        signals: Option<&PreferenceSignals>,
    ) -> ScoreBreakdown;

    /// Clamp a raw component score into `0.0..=1.0`.
    ///
    /// Non-finite inputs map to [`crate::NEUTRAL_SCORE`]. Implementations
    /// should pass every externally derived component through this before
    /// combining.
    #[must_use]
    fn sanitise(component: f32) -> f32
    where
        Self: Sized,
    {
        sanitise(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NEUTRAL_SCORE;

    struct NeutralScorer;

    impl Scorer for NeutralScorer {
        fn score(
            &self,
            _amenity: &Amenity,
            _context: &SelectionContext,
            _signals: Option<&PreferenceSignals>,
        ) -> ScoreBreakdown {
            ScoreBreakdown::neutral()
        }
    }

    #[test]
    fn sanitise_handles_non_finite_input() {
        assert_eq!(NeutralScorer::sanitise(f32::NAN), NEUTRAL_SCORE);
        assert_eq!(NeutralScorer::sanitise(f32::INFINITY), NEUTRAL_SCORE);
        assert_eq!(NeutralScorer::sanitise(1.5), 1.0);
        assert_eq!(NeutralScorer::sanitise(-0.5), 0.0);
    }
}
