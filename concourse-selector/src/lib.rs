//! Diversity-constrained top-K selection.
//!
//! [`DiversitySelector`] turns a scored candidate pool into an ordered
//! shortlist: sort by score, admit greedily under per-zone, per-price, and
//! per-category caps, then backfill past the caps when the pool's
//! composition leaves the shortlist under target. The whole pass is
//! deterministic; ties break on the featured flag and then the amenity id.

#![forbid(unsafe_code)]

mod reason;

pub use reason::explain;

use std::cmp::Ordering;
use std::collections::HashMap;

use concourse_core::{
    Amenity, ContextSnapshot, DiversityRules, PriceTier, ScoreBreakdown, ScoredCandidate,
    SelectionResult, Selector,
};

/// The standard [`Selector`] implementation.
///
/// # Examples
/// ```
/// use chrono::NaiveDateTime;
/// use concourse_core::{
///     Amenity, ContextSnapshot, DiversityRules, ScoreBreakdown, ScoredCandidate,
///     ScoringWeights, SelectionContext, Selector,
/// };
/// use concourse_selector::DiversitySelector;
///
/// let context = SelectionContext::new(NaiveDateTime::default());
/// let snapshot = ContextSnapshot::capture(&context, &ScoringWeights::default());
/// let pool = vec![ScoredCandidate {
///     amenity: Amenity::new(1, "Kiosk", "Retail", "T1"),
///     breakdown: ScoreBreakdown::neutral(),
/// }];
/// let picks = DiversitySelector.select(pool, 7, &DiversityRules::recommended(), &snapshot);
/// assert_eq!(picks.len(), 1);
/// assert_eq!(picks.first().map(|p| p.rank), Some(1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversitySelector;

impl Selector for DiversitySelector {
    fn select(
        &self,
        candidates: Vec<ScoredCandidate>,
        target: usize,
        rules: &DiversityRules,
        snapshot: &ContextSnapshot,
    ) -> Vec<SelectionResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        if candidates.len() <= target {
            return small_pool(candidates, snapshot);
        }
        constrained(candidates, target, rules, snapshot)
    }
}

/// With no real choice to make, return everything at maximal score,
/// ordered by the featured flag and then id.
fn small_pool(candidates: Vec<ScoredCandidate>, snapshot: &ContextSnapshot) -> Vec<SelectionResult> {
    let mut pool = candidates;
    pool.sort_by(|a, b| priority_order(&a.amenity, &b.amenity));
    pool.into_iter()
        .enumerate()
        .map(|(index, candidate)| SelectionResult {
            amenity: candidate.amenity,
            breakdown: ScoreBreakdown::maximal(),
            rank: index + 1,
            reason: None,
            context: snapshot.clone(),
        })
        .collect()
}

fn constrained(
    candidates: Vec<ScoredCandidate>,
    target: usize,
    rules: &DiversityRules,
    snapshot: &ContextSnapshot,
) -> Vec<SelectionResult> {
    let mut pool = candidates;
    pool.sort_by(score_order);

    let mut tally = DiversityTally::default();
    let mut admitted: Vec<ScoredCandidate> = Vec::with_capacity(target);
    let mut passed_over: Vec<ScoredCandidate> = Vec::new();

    for candidate in pool {
        if admitted.len() == target {
            break;
        }
        if tally.admits(&candidate.amenity, rules) {
            tally.record(&candidate.amenity);
            admitted.push(candidate);
        } else {
            passed_over.push(candidate);
        }
    }

    // Backfill ignores the caps; capped picks keep their earlier ranks.
    let shortfall = target.saturating_sub(admitted.len());
    admitted.extend(passed_over.into_iter().take(shortfall));

    admitted
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| SelectionResult {
            amenity: candidate.amenity,
            breakdown: candidate.breakdown,
            rank: index + 1,
            reason: None,
            context: snapshot.clone(),
        })
        .collect()
}

/// Running per-dimension counts for the capped pass.
#[derive(Default)]
struct DiversityTally {
    zones: HashMap<String, usize>,
    tiers: HashMap<PriceTier, usize>,
    categories: HashMap<String, usize>,
}

impl DiversityTally {
    fn admits(&self, amenity: &Amenity, rules: &DiversityRules) -> bool {
        if let Some(cap) = rules.max_same_zone {
            if self.zones.get(&amenity.zone).copied().unwrap_or(0) >= cap {
                return false;
            }
        }
        if let (Some(cap), Some(tier)) = (rules.max_same_price_tier, amenity.price_tier) {
            if self.tiers.get(&tier).copied().unwrap_or(0) >= cap {
                return false;
            }
        }
        if let Some(cap) = rules.category_cap() {
            if self.categories.get(&amenity.category).copied().unwrap_or(0) >= cap {
                return false;
            }
        }
        true
    }

    fn record(&mut self, amenity: &Amenity) {
        *self.zones.entry(amenity.zone.clone()).or_default() += 1;
        if let Some(tier) = amenity.price_tier {
            *self.tiers.entry(tier).or_default() += 1;
        }
        *self.categories.entry(amenity.category.clone()).or_default() += 1;
    }
}

/// Total score descending; ties break on featured then id.
fn score_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.breakdown
        .total
        .total_cmp(&a.breakdown.total)
        .then_with(|| priority_order(&a.amenity, &b.amenity))
}

/// Featured amenities first, then ascending id.
fn priority_order(a: &Amenity, b: &Amenity) -> Ordering {
    b.featured.cmp(&a.featured).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use concourse_core::{ScoringWeights, SelectionContext};
    use concourse_core::test_support::amenity;
    use rstest::rstest;

    fn snapshot() -> ContextSnapshot {
        let context = SelectionContext::new(NaiveDateTime::default());
        ContextSnapshot::capture(&context, &ScoringWeights::default())
    }

    fn scored(venue: Amenity, total: f32) -> ScoredCandidate {
        let breakdown = ScoreBreakdown {
            total,
            ..ScoreBreakdown::neutral()
        };
        ScoredCandidate {
            amenity: venue,
            breakdown,
        }
    }

    #[rstest]
    fn empty_pool_selects_nothing() {
        let picks = DiversitySelector.select(Vec::new(), 7, &DiversityRules::recommended(), &snapshot());
        assert!(picks.is_empty());
    }

    #[rstest]
    fn small_pool_returns_everything_maximal() {
        let pool = vec![
            scored(amenity(2), 0.1),
            scored(amenity(1).featured(), 0.05),
            scored(amenity(3), 0.9),
        ];
        let picks = DiversitySelector.select(pool, 7, &DiversityRules::recommended(), &snapshot());
        let ids: Vec<u64> = picks.iter().map(|p| p.amenity.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(picks.iter().all(|p| p.breakdown == ScoreBreakdown::maximal()));
        let ranks: Vec<usize> = picks.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[rstest]
    fn zone_cap_limits_capped_pass_and_backfill_completes() {
        let rules = DiversityRules {
            max_same_zone: Some(3),
            ..DiversityRules::default()
        };
        let pool: Vec<ScoredCandidate> = (1..=20)
            .map(|id| {
                let venue = Amenity::new(id, format!("Venue {id}"), format!("Cat {id}"), "A");
                #[expect(clippy::cast_precision_loss, reason = "small test ids")]
                let total = 1.0 - (id as f32) * 0.01;
                scored(venue, total)
            })
            .collect();
        let picks = DiversitySelector.select(pool, 7, &rules, &snapshot());
        assert_eq!(picks.len(), 7);
        // Capped pass admits ids 1-3; backfill appends the next best.
        let ids: Vec<u64> = picks.iter().map(|p| p.amenity.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    fn category_cap_applies_implicitly_when_balancing() {
        let rules = DiversityRules {
            balance_categories: true,
            ..DiversityRules::default()
        };
        let pool: Vec<ScoredCandidate> = (1..=10)
            .map(|id| {
                let zone = format!("Z{id}");
                let venue = Amenity::new(id, format!("Venue {id}"), "Food & Dining", zone);
                #[expect(clippy::cast_precision_loss, reason = "small test ids")]
                let total = 1.0 - (id as f32) * 0.01;
                scored(venue, total)
            })
            .collect();
        let picks = DiversitySelector.select(pool, 4, &rules, &snapshot());
        let ids: Vec<u64> = picks.iter().map(|p| p.amenity.id).collect();
        // Two via the capped pass, two backfilled in score order.
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn featured_wins_score_ties() {
        let pool = vec![
            scored(amenity(5), 0.7),
            scored(amenity(4).featured(), 0.7),
            scored(amenity(3), 0.7),
            scored(amenity(2), 0.6),
            scored(amenity(1), 0.5),
            scored(amenity(6), 0.4),
            scored(amenity(7), 0.3),
            scored(amenity(8), 0.2),
        ];
        let picks = DiversitySelector.select(pool, 2, &DiversityRules::default(), &snapshot());
        let ids: Vec<u64> = picks.iter().map(|p| p.amenity.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[rstest]
    fn untiered_amenities_bypass_the_price_cap() {
        let rules = DiversityRules {
            max_same_price_tier: Some(1),
            ..DiversityRules::default()
        };
        let pool: Vec<ScoredCandidate> = (1..=5)
            .map(|id| {
                let venue = Amenity::new(id, format!("Venue {id}"), format!("Cat {id}"), "A");
                #[expect(clippy::cast_precision_loss, reason = "small test ids")]
                let total = 1.0 - (id as f32) * 0.01;
                scored(venue, total)
            })
            .collect();
        let picks = DiversitySelector.select(pool, 4, &rules, &snapshot());
        assert_eq!(picks.len(), 4);
    }
}
