//! Shared fixture builders for tests across the workspace.
//!
//! Enabled with the `test-support` feature; not part of the public API
//! proper.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{Amenity, InteractionEvent, InteractionKind, SelectionContext};

/// Fixed fixture date used by time-sensitive tests.
#[must_use]
pub fn fixture_time(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

/// A minimal dining amenity with a deterministic name.
#[must_use]
pub fn amenity(id: u64) -> Amenity {
    Amenity::new(id, format!("Amenity {id}"), "Food & Dining", "T1")
}

/// A selection context at the given hour on the fixture date.
#[must_use]
pub fn context_at(hour: u32) -> SelectionContext {
    SelectionContext::new(fixture_time(hour))
}

/// A click event on `amenity_id` at the given hour.
#[must_use]
pub fn click(amenity_id: u64, hour: u32) -> InteractionEvent {
    InteractionEvent::new(amenity_id, InteractionKind::Click, fixture_time(hour))
}

/// A view event on `amenity_id` with a measured dwell.
#[must_use]
pub fn view_with_dwell(amenity_id: u64, hour: u32, dwell_seconds: u32) -> InteractionEvent {
    InteractionEvent::new(amenity_id, InteractionKind::View, fixture_time(hour))
        .with_dwell(dwell_seconds)
}
