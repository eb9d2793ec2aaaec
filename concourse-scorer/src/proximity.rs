//! Zone-adjacency proximity scoring.

use concourse_core::NEUTRAL_SCORE;
use std::collections::BTreeMap;

/// How far apart two zones are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ZoneDistance {
    /// The same zone.
    Same,
    /// A directly connected neighbour.
    Adjacent,
    /// Reachable but a trek.
    Far,
}

/// Score levels for each distance class.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityScores {
    /// Score for the caller's own zone.
    pub same: f32,
    /// Score for adjacent zones.
    pub adjacent: f32,
    /// Score for far zones.
    pub far: f32,
}

impl Default for ProximityScores {
    fn default() -> Self {
        Self {
            same: 1.0,
            adjacent: 0.6,
            far: 0.3,
        }
    }
}

impl ProximityScores {
    /// The score for a distance class.
    #[must_use]
    pub const fn for_distance(&self, distance: ZoneDistance) -> f32 {
        match distance {
            ZoneDistance::Same => self.same,
            ZoneDistance::Adjacent => self.adjacent,
            ZoneDistance::Far => self.far,
        }
    }
}

/// Symmetric lookup table classifying zone pairs.
///
/// Pairs are stored order-normalised, so one `with_link` call covers both
/// directions. Identical zones are always [`ZoneDistance::Same`] without a
/// table entry; pairs absent from the table are unknown and score neutral.
///
/// # Examples
/// ```
/// use concourse_scorer::{ZoneAdjacency, ZoneDistance};
///
/// let zones = ZoneAdjacency::default()
///     .with_link("T1", "T2", ZoneDistance::Adjacent)
///     .with_link("T1", "T4", ZoneDistance::Far);
/// assert_eq!(zones.classify("T2", "T1"), Some(ZoneDistance::Adjacent));
/// assert_eq!(zones.classify("T1", "T1"), Some(ZoneDistance::Same));
/// assert_eq!(zones.classify("T2", "T4"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneAdjacency {
    links: BTreeMap<(String, String), ZoneDistance>,
}

impl ZoneAdjacency {
    /// Record the distance between two zones, in either order.
    #[must_use]
    pub fn with_link(
        mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        distance: ZoneDistance,
    ) -> Self {
        self.links.insert(normalise(a.into(), b.into()), distance);
        self
    }

    /// Classify a zone pair, or `None` when the pair is unknown.
    #[must_use]
    pub fn classify(&self, a: &str, b: &str) -> Option<ZoneDistance> {
        if a == b {
            return Some(ZoneDistance::Same);
        }
        self.links
            .get(&normalise(a.to_owned(), b.to_owned()))
            .copied()
    }
}

fn normalise(a: String, b: String) -> (String, String) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Score an amenity's zone relative to the caller's, in `0.0..=1.0`.
///
/// No caller zone, or an unknown pair, scores neutral.
pub(crate) fn proximity_relevance(
    adjacency: &ZoneAdjacency,
    scores: &ProximityScores,
    caller_zone: Option<&str>,
    amenity_zone: &str,
) -> f32 {
    caller_zone
        .and_then(|zone| adjacency.classify(zone, amenity_zone))
        .map_or(NEUTRAL_SCORE, |distance| scores.for_distance(distance))
}
