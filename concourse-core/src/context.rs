//! Per-run selection context.
//!
//! The context is supplied fresh by the caller for every invocation and
//! never mutated mid-run. The engine derives the hour of day from the
//! caller's timestamp rather than the wall clock, which keeps scoring pure
//! and testable.

use chrono::{NaiveDateTime, Timelike};

use crate::PriceTier;

/// Caller-supplied situation for one selection run.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use concourse_core::SelectionContext;
///
/// let at = NaiveDate::from_ymd_opt(2025, 6, 1)
///     .and_then(|d| d.and_hms_opt(7, 30, 0))
///     .unwrap_or_default();
/// let context = SelectionContext::new(at).with_zone("T2");
/// assert_eq!(context.hour(), 7);
/// assert_eq!(context.zone.as_deref(), Some("T2"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionContext {
    /// Local wall-clock time at the venue.
    pub timestamp: NaiveDateTime,
    /// Zone the caller is currently in, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zone: Option<String>,
    /// Minutes remaining before the caller must move on, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub remaining_minutes: Option<u32>,
    /// Explicit price preference for this run, when stated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price_preference: Option<PriceTier>,
}

impl SelectionContext {
    /// Construct a context at the given local time.
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            zone: None,
            remaining_minutes: None,
            price_preference: None,
        }
    }

    /// Attach the caller's zone.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Attach the remaining transit time in minutes.
    #[must_use]
    pub const fn with_remaining_minutes(mut self, minutes: u32) -> Self {
        self.remaining_minutes = Some(minutes);
        self
    }

    /// Attach an explicit price preference.
    #[must_use]
    pub const fn with_price_preference(mut self, tier: PriceTier) -> Self {
        self.price_preference = Some(tier);
        self
    }

    /// Hour of day (0-23) of the context timestamp.
    #[must_use]
    pub fn hour(&self) -> u8 {
        u8::try_from(self.timestamp.hour()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap_or_default()
    }

    #[test]
    fn hour_tracks_timestamp() {
        assert_eq!(SelectionContext::new(at(23)).hour(), 23);
        assert_eq!(SelectionContext::new(at(0)).hour(), 0);
    }

    #[test]
    fn optional_fields_default_empty() {
        let context = SelectionContext::new(at(9));
        assert!(context.zone.is_none());
        assert!(context.remaining_minutes.is_none());
        assert!(context.price_preference.is_none());
    }
}
