//! Operating schedules with midnight wraparound.
//!
//! A [`Schedule`] is either always open, a set of named meal windows, or an
//! explicit open/close hour pair. A close hour numerically below the open
//! hour means the venue closes on the following day, so `22..6` is open at
//! 23:00 and 02:00 but closed at noon.

use std::collections::BTreeSet;

/// Check whether `hour` falls inside `[start, end)`, wrapping past
/// midnight when `end < start`.
///
/// # Examples
/// ```
/// use concourse_core::hour_within;
///
/// assert!(hour_within(23, 22, 6));
/// assert!(hour_within(2, 22, 6));
/// assert!(!hour_within(12, 22, 6));
/// ```
#[must_use]
pub const fn hour_within(hour: u8, start: u8, end: u8) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// A named service window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MealWindow {
    /// 06:00-11:00.
    Breakfast,
    /// 11:00-14:00.
    Lunch,
    /// 18:00-22:00.
    Dinner,
    /// No fixed hours; snacks work at any time of day.
    Snack,
}

impl MealWindow {
    /// Open/close hours for the window, or `None` for [`MealWindow::Snack`].
    #[must_use]
    pub const fn hours(self) -> Option<(u8, u8)> {
        match self {
            Self::Breakfast => Some((6, 11)),
            Self::Lunch => Some((11, 14)),
            Self::Dinner => Some((18, 22)),
            Self::Snack => None,
        }
    }

    /// Whether `hour` falls inside this window. Snack windows match any hour.
    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        match self.hours() {
            Some((start, end)) => hour_within(hour, start, end),
            None => true,
        }
    }

    /// The fixed-hour window covering `hour`, if any.
    ///
    /// Snack is excluded: it has no hours of its own.
    #[must_use]
    pub fn current(hour: u8) -> Option<Self> {
        [Self::Breakfast, Self::Lunch, Self::Dinner]
            .into_iter()
            .find(|window| window.contains(hour))
    }

    /// Lowercase name of the window.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an amenity is open.
///
/// # Examples
/// ```
/// use concourse_core::Schedule;
///
/// let overnight = Schedule::Hours { open: 22, close: 6 };
/// assert!(overnight.is_open_at(23));
/// assert!(overnight.is_open_at(2));
/// assert!(!overnight.is_open_at(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Schedule {
    /// Open around the clock.
    #[default]
    AlwaysOpen,
    /// Open during the named meal windows.
    Windows(BTreeSet<MealWindow>),
    /// Open between two hours of day; `close < open` wraps past midnight.
    Hours {
        /// Opening hour (0-23).
        open: u8,
        /// Closing hour (0-23), exclusive.
        close: u8,
    },
}

impl Schedule {
    /// Whether the schedule admits the given hour of day.
    #[must_use]
    pub fn is_open_at(&self, hour: u8) -> bool {
        match self {
            Self::AlwaysOpen => true,
            Self::Windows(windows) => windows.iter().any(|window| window.contains(hour)),
            Self::Hours { open, close } => hour_within(hour, *open, *close),
        }
    }

    /// Convenience constructor for a window set.
    #[must_use]
    pub fn windows<I: IntoIterator<Item = MealWindow>>(windows: I) -> Self {
        Self::Windows(windows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(23, true)]
    #[case(2, true)]
    #[case(12, false)]
    #[case(22, true)]
    #[case(6, false)]
    fn overnight_hours_wrap_midnight(#[case] hour: u8, #[case] open: bool) {
        let schedule = Schedule::Hours { open: 22, close: 6 };
        assert_eq!(schedule.is_open_at(hour), open);
    }

    #[rstest]
    #[case(7, true)]
    #[case(11, false)]
    fn breakfast_window_bounds(#[case] hour: u8, #[case] expected: bool) {
        assert_eq!(MealWindow::Breakfast.contains(hour), expected);
    }

    #[rstest]
    fn snack_matches_any_hour() {
        assert!(MealWindow::Snack.contains(3));
        assert!(MealWindow::Snack.contains(15));
    }

    #[rstest]
    #[case(8, Some(MealWindow::Breakfast))]
    #[case(12, Some(MealWindow::Lunch))]
    #[case(19, Some(MealWindow::Dinner))]
    #[case(15, None)]
    fn current_window_lookup(#[case] hour: u8, #[case] expected: Option<MealWindow>) {
        assert_eq!(MealWindow::current(hour), expected);
    }

    #[rstest]
    fn window_schedule_matches_member_windows() {
        let schedule = Schedule::windows([MealWindow::Breakfast, MealWindow::Dinner]);
        assert!(schedule.is_open_at(7));
        assert!(schedule.is_open_at(19));
        assert!(!schedule.is_open_at(15));
    }

    #[rstest]
    fn always_open_never_closes() {
        assert!(Schedule::AlwaysOpen.is_open_at(4));
    }
}
