//! Personalised preference scoring from derived signals.

use concourse_core::{Amenity, EngagementPattern, NEUTRAL_SCORE, PreferenceSignals};

const CLICKED_BONUS: f32 = 0.3;
const BOOKMARKED_BONUS: f32 = 0.4;
const AVOIDED_PENALTY: f32 = 0.3;
const PRICE_MATCH: f32 = 0.2;
const TAG_MATCH: f32 = 0.1;
const EXPLORER_SEEN_PENALTY: f32 = 0.2;
const FOCUSED_SEEN_BONUS: f32 = 0.15;

/// Score how well an amenity matches the session's derived preferences,
/// in `0.0..=1.0`.
///
/// The interaction bonuses are independent and additive; an amenity that
/// was both clicked and bookmarked collects both. The tag bonus is
/// uncapped before the final clamp.
#[expect(
    clippy::float_arithmetic,
    reason = "preference evidence accumulates additively before clamping"
)]
pub(crate) fn preference_relevance(amenity: &Amenity, signals: &PreferenceSignals) -> f32 {
    let mut score = NEUTRAL_SCORE;
    if signals.clicked.contains(&amenity.id) {
        score += CLICKED_BONUS;
    }
    if signals.bookmarked.contains(&amenity.id) {
        score += BOOKMARKED_BONUS;
    }
    if signals.avoided.contains(&amenity.id) {
        score -= AVOIDED_PENALTY;
    }
    if let (Some(tier), false) = (amenity.price_tier, signals.preferred_price_tiers.is_empty()) {
        if signals.preferred_price_tiers.contains(&tier) {
            score += PRICE_MATCH;
        } else {
            score -= PRICE_MATCH;
        }
    }
    for tag in &signals.preferred_tags {
        if amenity.has_tag(tag) {
            score += TAG_MATCH;
        }
    }
    let seen = signals.viewed.contains(&amenity.id);
    match signals.pattern {
        EngagementPattern::Explorer if seen => score -= EXPLORER_SEEN_PENALTY,
        EngagementPattern::Focused if seen => score += FOCUSED_SEEN_BONUS,
        EngagementPattern::Explorer | EngagementPattern::Focused | EngagementPattern::Quick => {}
    }
    score.clamp(0.0, 1.0)
}
