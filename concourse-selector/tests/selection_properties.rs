//! Property-based invariants for the selector.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use concourse_core::{
    Amenity, ContextSnapshot, DiversityRules, PriceTier, ScoreBreakdown, ScoredCandidate,
    ScoringWeights, SelectionContext, Selector,
};
use concourse_selector::DiversitySelector;
use proptest::prelude::*;

fn snapshot() -> ContextSnapshot {
    let context = SelectionContext::new(NaiveDateTime::default());
    ContextSnapshot::capture(&context, &ScoringWeights::default())
}

fn tier(index: u8) -> PriceTier {
    match index % 4 {
        0 => PriceTier::Budget,
        1 => PriceTier::Moderate,
        2 => PriceTier::Upscale,
        _ => PriceTier::Luxury,
    }
}

prop_compose! {
    fn arb_candidate(id: u64)(
        zone in 0_u8..4,
        category in 0_u8..5,
        price in 0_u8..4,
        featured in any::<bool>(),
        total in 0.0_f32..=1.0,
    ) -> ScoredCandidate {
        let mut amenity = Amenity::new(
            id,
            format!("Venue {id}"),
            format!("Cat {category}"),
            format!("Z{zone}"),
        )
        .with_price_tier(tier(price));
        if featured {
            amenity = amenity.featured();
        }
        ScoredCandidate {
            amenity,
            breakdown: ScoreBreakdown {
                total,
                ..ScoreBreakdown::neutral()
            },
        }
    }
}

fn arb_pool() -> impl Strategy<Value = Vec<ScoredCandidate>> {
    (0_u64..40).prop_flat_map(|len| {
        (0..len).map(arb_candidate).collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn result_length_is_min_of_target_and_pool(pool in arb_pool(), target in 0_usize..10) {
        let picks = DiversitySelector.select(
            pool.clone(),
            target,
            &DiversityRules::recommended(),
            &snapshot(),
        );
        if pool.len() <= target {
            prop_assert_eq!(picks.len(), pool.len());
        } else {
            prop_assert_eq!(picks.len(), target);
        }
    }

    #[test]
    fn ranks_are_contiguous_from_one(pool in arb_pool()) {
        let picks = DiversitySelector.select(
            pool,
            7,
            &DiversityRules::recommended(),
            &snapshot(),
        );
        for (index, pick) in picks.iter().enumerate() {
            prop_assert_eq!(pick.rank, index + 1);
        }
    }

    #[test]
    fn selection_is_deterministic(pool in arb_pool()) {
        let first = DiversitySelector.select(
            pool.clone(),
            7,
            &DiversityRules::recommended(),
            &snapshot(),
        );
        let second = DiversitySelector.select(
            pool,
            7,
            &DiversityRules::recommended(),
            &snapshot(),
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unconstrained_selection_never_repeats_an_id(pool in arb_pool()) {
        let picks = DiversitySelector.select(
            pool,
            7,
            &DiversityRules::default(),
            &snapshot(),
        );
        let mut seen = HashMap::new();
        for pick in &picks {
            *seen.entry(pick.amenity.id).or_insert(0_u32) += 1;
        }
        prop_assert!(seen.values().all(|count| *count == 1));
    }

    #[test]
    fn zone_cap_holds_when_pool_is_diverse_enough(target in 1_usize..8) {
        // Four zones with plenty of spread keep the capped pass sufficient,
        // so no zone may exceed its cap in the final shortlist.
        let pool: Vec<ScoredCandidate> = (0_u64..24)
            .map(|id| {
                let zone = format!("Z{}", id % 4);
                ScoredCandidate {
                    amenity: Amenity::new(id, format!("Venue {id}"), format!("Cat {id}"), zone),
                    breakdown: ScoreBreakdown::neutral(),
                }
            })
            .collect();
        let rules = DiversityRules {
            max_same_zone: Some(2),
            ..DiversityRules::default()
        };
        let picks = DiversitySelector.select(pool, target, &rules, &snapshot());
        let mut per_zone: HashMap<String, usize> = HashMap::new();
        for pick in &picks {
            *per_zone.entry(pick.amenity.zone.clone()).or_default() += 1;
        }
        prop_assert!(per_zone.values().all(|count| *count <= 2));
        prop_assert_eq!(picks.len(), target);
    }
}
