//! Time-relevance scoring.
//!
//! Closed venues are heavily penalised but never scored zero, so an
//! "opens soon" surface can still rank them elsewhere. Always-open venues
//! score well but not perfectly, leaving headroom for specialty venues in
//! their window.

use concourse_core::{Amenity, MealWindow, NEUTRAL_SCORE, Schedule, hour_within};
use std::collections::BTreeSet;

const CLOSED: f32 = 0.1;
const ALWAYS_OPEN: f32 = 0.8;
const OFF_WINDOW: f32 = 0.4;
const SNACK_WINDOW: f32 = 0.7;
const BREAKFAST_WINDOW: f32 = 0.95;
const LUNCH_WINDOW: f32 = 0.9;
const DINNER_WINDOW: f32 = 0.9;
const FOOD_BREAKFAST_TAGGED: f32 = 0.95;
const FOOD_IN_WINDOW: f32 = 0.85;
const FOOD_DINNER: f32 = 0.9;
const RETAIL_DAY: f32 = 0.8;
const LATE_NIGHT_LOUNGE: f32 = 0.9;
const PEAK_BONUS: f32 = 0.3;

const RETAIL_OPEN_HOUR: u8 = 10;
const RETAIL_CLOSE_HOUR: u8 = 20;
const LATE_NIGHT_START: u8 = 22;
const LATE_NIGHT_END: u8 = 6;

/// Score how well an amenity suits the current hour, in `0.0..=1.0`.
#[expect(
    clippy::float_arithmetic,
    reason = "peak-hour membership adds a bonus before clamping"
)]
pub(crate) fn time_relevance(amenity: &Amenity, hour: u8) -> f32 {
    if !amenity.open_now || !amenity.schedule.is_open_at(hour) {
        return CLOSED;
    }
    let mut score = match &amenity.schedule {
        Schedule::Windows(windows) => window_score(windows, hour),
        Schedule::AlwaysOpen | Schedule::Hours { .. } => category_score(amenity, hour),
    };
    if amenity.peak_hours.contains(&hour) {
        score += PEAK_BONUS;
    }
    score.clamp(0.0, 1.0)
}

/// Best score among the declared windows that admit `hour`.
fn window_score(windows: &BTreeSet<MealWindow>, hour: u8) -> f32 {
    windows
        .iter()
        .filter(|window| window.contains(hour))
        .map(|window| match window {
            MealWindow::Breakfast => BREAKFAST_WINDOW,
            MealWindow::Lunch => LUNCH_WINDOW,
            MealWindow::Dinner => DINNER_WINDOW,
            MealWindow::Snack => SNACK_WINDOW,
        })
        .fold(CLOSED, f32::max)
}

/// Heuristic score for venues without declared meal windows.
fn category_score(amenity: &Amenity, hour: u8) -> f32 {
    let category = amenity.category.to_lowercase();
    if category.contains("food") || category.contains("dining") {
        return food_score(amenity, hour);
    }
    if category.contains("retail") || category.contains("shop") {
        return if hour_within(hour, RETAIL_OPEN_HOUR, RETAIL_CLOSE_HOUR) {
            RETAIL_DAY
        } else {
            OFF_WINDOW
        };
    }
    let relaxing = category.contains("lounge") || amenity.has_tag("relaxation");
    if relaxing && hour_within(hour, LATE_NIGHT_START, LATE_NIGHT_END) {
        return LATE_NIGHT_LOUNGE;
    }
    match amenity.schedule {
        Schedule::AlwaysOpen => ALWAYS_OPEN,
        Schedule::Windows(_) | Schedule::Hours { .. } => NEUTRAL_SCORE,
    }
}

/// Food venues ride the current meal window; outside all windows they
/// drop to the off-window penalty.
fn food_score(amenity: &Amenity, hour: u8) -> f32 {
    // `current` only yields fixed-hour windows; Snack has no hours of its
    // own, so it falls in with the off-window case.
    match MealWindow::current(hour) {
        Some(MealWindow::Breakfast) => {
            if amenity.has_tag("breakfast") {
                FOOD_BREAKFAST_TAGGED
            } else {
                FOOD_IN_WINDOW
            }
        }
        Some(MealWindow::Lunch) => FOOD_IN_WINDOW,
        Some(MealWindow::Dinner) => FOOD_DINNER,
        Some(MealWindow::Snack) | None => OFF_WINDOW,
    }
}
