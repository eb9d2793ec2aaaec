//! Distilling raw interaction history into preference signals.

use std::collections::{BTreeMap, BTreeSet};

use concourse_core::{
    Amenity, EngagementPattern, InteractionEvent, InteractionKind, PreferenceSignals, PriceTier,
};

/// Derives [`PreferenceSignals`] from a bounded window of raw events.
///
/// Aggregation is a pure transformation: identical history and catalogue
/// always yield identical signals, with every ranked list ordered by
/// descending frequency and ties broken by the key's natural order.
///
/// # Examples
/// ```
/// use concourse_core::EngagementPattern;
/// use concourse_scorer::PreferenceAggregator;
///
/// let signals = PreferenceAggregator::default().aggregate(&[], &[]);
/// assert!(signals.is_empty());
/// assert_eq!(signals.pattern, EngagementPattern::Quick);
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceAggregator {
    /// Number of top tags to keep.
    pub top_tag_count: usize,
    /// Number of most-clicked ids to keep.
    pub top_click_count: usize,
    /// Average dwell (seconds per measured view) above which a session
    /// counts as an explorer.
    pub long_dwell_seconds: u32,
    /// Distinct-click ceiling below which repeated clicks count as a
    /// focused session.
    pub focused_click_ceiling: usize,
    /// Number of most recent events considered.
    pub recent_window: usize,
}

impl Default for PreferenceAggregator {
    fn default() -> Self {
        Self {
            top_tag_count: 5,
            top_click_count: 10,
            long_dwell_seconds: 30,
            focused_click_ceiling: 5,
            recent_window: 100,
        }
    }
}

impl PreferenceAggregator {
    /// Aggregate `events` (newest first) against the amenity catalogue.
    ///
    /// Empty history yields default signals with the `quick` pattern.
    /// Events referencing ids absent from the catalogue still count for
    /// the id sets and click ranking but cannot contribute tags or tiers.
    #[must_use]
    pub fn aggregate(
        &self,
        events: &[InteractionEvent],
        catalogue: &[Amenity],
    ) -> PreferenceSignals {
        let window: Vec<&InteractionEvent> = events.iter().take(self.recent_window).collect();
        if window.is_empty() {
            return PreferenceSignals::default();
        }
        let by_id: BTreeMap<u64, &Amenity> =
            catalogue.iter().map(|amenity| (amenity.id, amenity)).collect();

        let mut signals = PreferenceSignals::default();
        let mut click_counts: BTreeMap<u64, usize> = BTreeMap::new();
        let mut tag_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut tier_counts: BTreeMap<PriceTier, usize> = BTreeMap::new();
        let mut dwell_total: u64 = 0;
        let mut dwell_samples: u64 = 0;

        for event in &window {
            match event.kind {
                InteractionKind::View => {
                    signals.viewed.insert(event.amenity_id);
                }
                InteractionKind::Click => {
                    signals.clicked.insert(event.amenity_id);
                    *click_counts.entry(event.amenity_id).or_default() += 1;
                }
                InteractionKind::Bookmark => {
                    signals.bookmarked.insert(event.amenity_id);
                }
                InteractionKind::Avoid => {
                    signals.avoided.insert(event.amenity_id);
                }
            }
            if let Some(dwell) = event.dwell_seconds {
                dwell_total += u64::from(dwell);
                dwell_samples += 1;
            }
            match by_id.get(&event.amenity_id) {
                Some(amenity) => {
                    for tag in &amenity.tags {
                        *tag_counts.entry(tag.as_str()).or_default() += 1;
                    }
                    if let Some(tier) = amenity.price_tier {
                        *tier_counts.entry(tier).or_default() += 1;
                    }
                }
                None => log::debug!("history references unknown amenity {}", event.amenity_id),
            }
        }

        signals.preferred_tags = ranked(&tag_counts)
            .into_iter()
            .take(self.top_tag_count)
            .map(str::to_owned)
            .collect();
        signals.preferred_price_tiers = ranked(&tier_counts);
        signals.frequent_clicks = ranked(&click_counts)
            .into_iter()
            .take(self.top_click_count)
            .collect();
        signals.pattern = self.classify(dwell_total, dwell_samples, &click_counts);
        signals
    }

    /// Classify engagement: long average dwell wins, then repeated
    /// attention to a small clicked set, then quick by default.
    fn classify(
        &self,
        dwell_total: u64,
        dwell_samples: u64,
        click_counts: &BTreeMap<u64, usize>,
    ) -> EngagementPattern {
        // Compare dwell_total / samples > threshold without dividing.
        if dwell_samples > 0 && dwell_total > u64::from(self.long_dwell_seconds) * dwell_samples {
            return EngagementPattern::Explorer;
        }
        let repeated = click_counts.values().any(|count| *count > 1);
        if repeated && !click_counts.is_empty() && click_counts.len() < self.focused_click_ceiling {
            return EngagementPattern::Focused;
        }
        EngagementPattern::Quick
    }
}

/// Keys ordered by descending count, ties broken by ascending key.
fn ranked<K: Ord + Copy>(counts: &BTreeMap<K, usize>) -> Vec<K> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(key, count)| (*key, *count)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().map(|(key, _)| key).collect()
}
