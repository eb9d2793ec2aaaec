//! Human-readable justifications for selected amenities.

use concourse_core::{Amenity, MealWindow, Schedule, ScoreBreakdown, SelectionContext};

const REASON_THRESHOLD: f32 = 0.8;
const DEFAULT_REASON: &str = "Recommended for you";

/// Explain why an amenity was selected.
///
/// Ranks the three externally meaningful score components and, when the
/// strongest clears the threshold, emits a reason tied to that dimension.
/// Otherwise falls back to tag-based generics and finally a fixed default.
/// Pure and infallible.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use concourse_core::{Amenity, ScoreBreakdown, ScoringWeights, SelectionContext};
/// use concourse_selector::explain;
///
/// let at = NaiveDate::from_ymd_opt(2025, 6, 1)
///     .and_then(|d| d.and_hms_opt(7, 0, 0))
///     .unwrap_or_default();
/// let context = SelectionContext::new(at);
/// let venue = Amenity::new(1, "Toast Point", "Food & Dining", "T1");
/// let breakdown = ScoreBreakdown::from_components(
///     0.95, 0.5, 0.5, 0.5, &ScoringWeights::default(),
/// );
/// assert_eq!(explain(&venue, &breakdown, &context), "Perfect for breakfast");
/// ```
#[must_use]
pub fn explain(amenity: &Amenity, breakdown: &ScoreBreakdown, context: &SelectionContext) -> String {
    let mut components = [
        (Dimension::Time, breakdown.time),
        (Dimension::Proximity, breakdown.proximity),
        (Dimension::Preference, breakdown.preference),
    ];
    components.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some((dimension, value)) = components.first() {
        if *value > REASON_THRESHOLD {
            if let Some(reason) = dimension.reason(amenity, context) {
                return reason;
            }
        }
    }
    tag_reason(amenity).unwrap_or_else(|| DEFAULT_REASON.to_owned())
}

#[derive(Clone, Copy)]
enum Dimension {
    Time,
    Proximity,
    Preference,
}

impl Dimension {
    fn reason(self, amenity: &Amenity, context: &SelectionContext) -> Option<String> {
        match self {
            Self::Time => time_reason(amenity, context.hour()),
            Self::Proximity => proximity_reason(amenity, context),
            Self::Preference => Some("Based on your preferences".to_owned()),
        }
    }
}

fn time_reason(amenity: &Amenity, hour: u8) -> Option<String> {
    if let Some(window) = MealWindow::current(hour) {
        let template = match window {
            MealWindow::Breakfast => "Perfect for breakfast",
            MealWindow::Lunch => "Great lunch option",
            MealWindow::Dinner => "Ideal for dinner",
            MealWindow::Snack => return None,
        };
        return Some(template.to_owned());
    }
    if amenity.schedule == Schedule::AlwaysOpen {
        return Some("Open 24 hours".to_owned());
    }
    None
}

fn proximity_reason(amenity: &Amenity, context: &SelectionContext) -> Option<String> {
    context.zone.as_deref().map(|zone| {
        if zone == amenity.zone {
            "In your zone".to_owned()
        } else {
            "In a nearby zone".to_owned()
        }
    })
}

fn tag_reason(amenity: &Amenity) -> Option<String> {
    if amenity.has_tag("popular") {
        return Some("Popular choice".to_owned());
    }
    if amenity.has_tag("quick") {
        return Some("Quick stop".to_owned());
    }
    None
}
