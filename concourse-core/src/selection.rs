//! Selection inputs, outputs, and the selector seam.

use chrono::NaiveDateTime;

use crate::{Amenity, ScoreBreakdown, ScoringWeights, SelectionContext};

/// Caps on how similar the selected set may be.
///
/// A cap of `None` leaves that dimension unconstrained. Candidates with no
/// price tier never count against the price cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiversityRules {
    /// Maximum selections sharing one zone.
    pub max_same_zone: Option<usize>,
    /// Maximum selections sharing one price tier.
    pub max_same_price_tier: Option<usize>,
    /// Maximum selections sharing one category.
    pub max_same_category: Option<usize>,
    /// When set without an explicit category cap, imposes an implicit
    /// category cap of two.
    pub balance_categories: bool,
}

impl DiversityRules {
    /// The rule set used by default for a seven-slot shortlist.
    #[must_use]
    pub const fn recommended() -> Self {
        Self {
            max_same_zone: Some(3),
            max_same_price_tier: Some(3),
            max_same_category: Some(2),
            balance_categories: true,
        }
    }

    /// Effective category cap: the explicit cap when present, otherwise
    /// two when category balancing is requested.
    #[must_use]
    pub const fn category_cap(self) -> Option<usize> {
        match self.max_same_category {
            Some(cap) => Some(cap),
            None if self.balance_categories => Some(2),
            None => None,
        }
    }
}

/// A candidate paired with its score, ready for selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCandidate {
    /// The candidate amenity.
    pub amenity: Amenity,
    /// Its score breakdown in the current context.
    pub breakdown: ScoreBreakdown,
}

/// Frozen record of the conditions a selection was made under.
///
/// Stored alongside each result so a cached shortlist can be audited
/// after the live context has moved on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextSnapshot {
    /// Timestamp the run was scored against.
    pub timestamp: NaiveDateTime,
    /// Zone the caller reported, when known.
    pub zone: Option<String>,
    /// Weights in force for the run.
    pub weights: ScoringWeights,
}

impl ContextSnapshot {
    /// Capture the audit-relevant parts of a run's inputs.
    #[must_use]
    pub fn capture(context: &SelectionContext, weights: &ScoringWeights) -> Self {
        Self {
            timestamp: context.timestamp,
            zone: context.zone.clone(),
            weights: *weights,
        }
    }
}

/// One entry of a final shortlist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionResult {
    /// The selected amenity.
    pub amenity: Amenity,
    /// The score that earned its place.
    pub breakdown: ScoreBreakdown,
    /// Position in the shortlist, starting at 1.
    pub rank: usize,
    /// Human-readable justification, when requested.
    pub reason: Option<String>,
    /// Conditions the selection was made under.
    pub context: ContextSnapshot,
}

/// Turns a scored pool into an ordered shortlist.
///
/// Implementations must be deterministic: equal inputs yield identical
/// output, including order.
pub trait Selector {
    /// Choose up to `target` results from `candidates` under `rules`.
    fn select(
        &self,
        candidates: Vec<ScoredCandidate>,
        target: usize,
        rules: &DiversityRules,
        snapshot: &ContextSnapshot,
    ) -> Vec<SelectionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DiversityRules::default(), None)]
    #[case(DiversityRules::recommended(), Some(2))]
    #[case(
        DiversityRules { max_same_category: Some(4), ..DiversityRules::default() },
        Some(4)
    )]
    #[case(
        DiversityRules { balance_categories: true, ..DiversityRules::default() },
        Some(2)
    )]
    fn category_cap_resolution(#[case] rules: DiversityRules, #[case] expected: Option<usize>) {
        assert_eq!(rules.category_cap(), expected);
    }

    #[rstest]
    fn snapshot_captures_context_fields() {
        let context = SelectionContext::new(NaiveDateTime::default()).with_zone("T1");
        let weights = ScoringWeights::default();
        let snapshot = ContextSnapshot::capture(&context, &weights);
        assert_eq!(snapshot.zone.as_deref(), Some("T1"));
        assert_eq!(snapshot.weights, weights);
    }
}
