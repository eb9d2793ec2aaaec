//! Interaction history and the preference signals distilled from it.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

use crate::PriceTier;

/// The kind of a single recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InteractionKind {
    /// The amenity was shown and scrolled into view.
    View,
    /// The amenity's detail page was opened.
    Click,
    /// The amenity was saved for later.
    Bookmark,
    /// The amenity was explicitly dismissed.
    Avoid,
}

/// One recorded interaction with one amenity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionEvent {
    /// The amenity interacted with.
    pub amenity_id: u64,
    /// What the session did.
    pub kind: InteractionKind,
    /// When the interaction happened.
    pub timestamp: NaiveDateTime,
    /// Seconds the amenity stayed in view, when measured.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dwell_seconds: Option<u32>,
}

impl InteractionEvent {
    /// Record an interaction without dwell information.
    #[must_use]
    pub const fn new(amenity_id: u64, kind: InteractionKind, timestamp: NaiveDateTime) -> Self {
        Self {
            amenity_id,
            kind,
            timestamp,
            dwell_seconds: None,
        }
    }

    /// Attach a measured dwell time in seconds.
    #[must_use]
    pub const fn with_dwell(mut self, seconds: u32) -> Self {
        self.dwell_seconds = Some(seconds);
        self
    }
}

/// Coarse behavioural classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EngagementPattern {
    /// Short visits, little dwell; the default with no evidence.
    #[default]
    Quick,
    /// Long dwell across many amenities; rewards novelty.
    Explorer,
    /// Repeated attention to a small set; rewards familiarity.
    Focused,
}

impl EngagementPattern {
    /// Lowercase name of the pattern.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Explorer => "explorer",
            Self::Focused => "focused",
        }
    }
}

impl std::fmt::Display for EngagementPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated preference evidence for one session.
///
/// All collections are deterministic: id sets are sorted, and the ranked
/// vectors are ordered by descending frequency with ties broken by the
/// natural order of the key.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceSignals {
    /// Amenities the session clicked into.
    pub clicked: BTreeSet<u64>,
    /// Amenities the session viewed.
    pub viewed: BTreeSet<u64>,
    /// Amenities the session bookmarked.
    pub bookmarked: BTreeSet<u64>,
    /// Amenities the session dismissed.
    pub avoided: BTreeSet<u64>,
    /// Price tiers ranked by interaction frequency.
    pub preferred_price_tiers: Vec<PriceTier>,
    /// Most frequent tags, best first.
    pub preferred_tags: Vec<String>,
    /// Most frequently clicked amenity ids, best first.
    pub frequent_clicks: Vec<u64>,
    /// Behavioural classification of the session.
    pub pattern: EngagementPattern,
}

impl PreferenceSignals {
    /// Whether the session left no usable evidence at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clicked.is_empty()
            && self.viewed.is_empty()
            && self.bookmarked.is_empty()
            && self.avoided.is_empty()
    }
}
