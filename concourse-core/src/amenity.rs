//! Candidate amenities and their price tiers.
//!
//! An [`Amenity`] is an immutable snapshot of a single candidate for the
//! duration of one selection run. Construction is infallible; optional
//! attributes are attached through chaining methods.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Schedule;

/// Ordinal price tier, from cheapest to most expensive.
///
/// # Examples
/// ```
/// use concourse_core::PriceTier;
///
/// assert!(PriceTier::Budget < PriceTier::Luxury);
/// assert_eq!(PriceTier::Moderate.as_str(), "$$");
/// assert_eq!("$$$".parse::<PriceTier>(), Ok(PriceTier::Upscale));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriceTier {
    /// Cheap, grab-and-go territory.
    Budget,
    /// Mid-range.
    Moderate,
    /// Premium but not exclusive.
    Upscale,
    /// Top-end venues.
    Luxury,
}

impl PriceTier {
    /// Return the tier in conventional dollar-sign notation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Upscale => "$$$",
            Self::Luxury => "$$$$",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`PriceTier`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown price tier '{0}'")]
pub struct PriceTierParseError(pub String);

impl std::str::FromStr for PriceTier {
    type Err = PriceTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "$" | "budget" => Ok(Self::Budget),
            "$$" | "moderate" => Ok(Self::Moderate),
            "$$$" | "upscale" => Ok(Self::Upscale),
            "$$$$" | "luxury" => Ok(Self::Luxury),
            _ => Err(PriceTierParseError(s.to_owned())),
        }
    }
}

/// A single candidate amenity, frozen for one selection run.
///
/// Tags are free-form descriptive labels ("breakfast", "quiet",
/// "popular") kept in a sorted set so iteration order is deterministic.
///
/// # Examples
/// ```
/// use concourse_core::{Amenity, PriceTier, Schedule};
///
/// let amenity = Amenity::new(7, "Toast Point", "Food & Dining", "T2")
///     .with_price_tier(PriceTier::Budget)
///     .with_tags(["breakfast", "popular"])
///     .with_schedule(Schedule::Hours { open: 6, close: 22 });
/// assert_eq!(amenity.id, 7);
/// assert!(amenity.tags.contains("breakfast"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amenity {
    /// Unique identifier within the candidate pool.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Coarse category tag, e.g. "Food & Dining" or "Retail".
    pub category: String,
    /// Physical zone the amenity sits in, e.g. a terminal code.
    pub zone: String,
    /// Price tier, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price_tier: Option<PriceTier>,
    /// Descriptive mood/vibe tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: BTreeSet<String>,
    /// Operating schedule.
    #[cfg_attr(feature = "serde", serde(default))]
    pub schedule: Schedule,
    /// Hours of day (0-23) during which the amenity peaks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub peak_hours: BTreeSet<u8>,
    /// Average visitor rating, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<f32>,
    /// Number of ratings behind [`Amenity::rating`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating_count: u32,
    /// Curated priority flag; featured amenities win score ties.
    #[cfg_attr(feature = "serde", serde(default))]
    pub featured: bool,
    /// Live open/closed status at snapshot time.
    #[cfg_attr(feature = "serde", serde(default = "default_open"))]
    pub open_now: bool,
}

#[cfg(feature = "serde")]
const fn default_open() -> bool {
    true
}

impl Amenity {
    /// Construct an amenity with the required attributes only.
    #[must_use]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        category: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            zone: zone.into(),
            price_tier: None,
            tags: BTreeSet::new(),
            schedule: Schedule::AlwaysOpen,
            peak_hours: BTreeSet::new(),
            rating: None,
            rating_count: 0,
            featured: false,
            open_now: true,
        }
    }

    /// Attach a price tier while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = Some(tier);
        self
    }

    /// Replace the tag set.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the operating schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Replace the peak-hour set.
    #[must_use]
    pub fn with_peak_hours<I: IntoIterator<Item = u8>>(mut self, hours: I) -> Self {
        self.peak_hours = hours.into_iter().collect();
        self
    }

    /// Attach a rating and its sample size.
    #[must_use]
    pub fn with_rating(mut self, rating: f32, count: u32) -> Self {
        self.rating = Some(rating);
        self.rating_count = count;
        self
    }

    /// Mark the amenity as curated/featured.
    #[must_use]
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Check whether a tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
