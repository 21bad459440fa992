//! Alignment of a rate window against today.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::clock::{Clock, SystemClock};

/// Minimum lookout, in nights, before the month padding is added.
const BASE_WINDOW_NIGHTS: usize = 366;

/// Day labels for a listing's rate window, starting today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWindow {
    /// One label per night, at most the requested window length.
    pub day_labels: Vec<String>,
    /// Position of today within `[begin, end]`; 0 when today is not covered.
    pub today_offset: usize,
    /// Whether today fell inside the rate window.
    ///
    /// When false the labels start at the window's first night instead of
    /// today, and the rates they label may be stale.
    pub today_found: bool,
}

impl CalendarWindow {
    /// Number of labelled nights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.day_labels.len()
    }

    /// Whether no night was labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day_labels.is_empty()
    }
}

/// Maps `[begin, end]` rate windows onto day labels starting today.
#[derive(Debug, Clone)]
pub struct CalendarAligner {
    clock: Arc<dyn Clock>,
}

impl Default for CalendarAligner {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CalendarAligner {
    /// Creates an aligner reading "today" from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Today's date according to the aligner's clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The adaptive window length for today.
    #[must_use]
    pub fn window_length(&self) -> usize {
        adaptive_window_length(self.today())
    }

    /// Walks every night from `begin` to `end` inclusive and labels up to
    /// `window_length` nights starting at today.
    ///
    /// If today is outside the window, `today_offset` is 0 and the labels start
    /// at `begin`; the window is flagged with `today_found = false`.
    #[must_use]
    pub fn align(&self, begin: NaiveDate, end: NaiveDate, window_length: usize) -> CalendarWindow {
        let today = self.today();
        let mut day_labels = Vec::new();
        let mut today_offset = None;

        for (position, day) in begin.iter_days().take_while(|d| *d <= end).enumerate() {
            if today_offset.is_none() && day == today {
                today_offset = Some(position);
            }
            if today_offset.is_some() {
                if day_labels.len() >= window_length {
                    break;
                }
                day_labels.push(format_day_label(day));
            }
        }

        if let Some(today_offset) = today_offset {
            return CalendarWindow {
                day_labels,
                today_offset,
                today_found: true,
            };
        }

        if begin <= end {
            warn!(
                %begin,
                %end,
                %today,
                "Today is outside the rate window; labelling from the first night"
            );
        }

        CalendarWindow {
            day_labels: begin
                .iter_days()
                .take_while(|d| *d <= end)
                .take(window_length)
                .map(format_day_label)
                .collect(),
            today_offset: 0,
            today_found: false,
        }
    }
}

/// Formats a night as `Mon DD YYYY`, e.g. `Jan 03 2024`.
#[must_use]
pub fn format_day_label(day: NaiveDate) -> String {
    day.format("%b %d %Y").to_string()
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(31, |last| last.day())
}

/// `366 + |day of month - days in month|`.
///
/// The padding grows early in the month so the window still reaches the same
/// calendar day a year out.
#[must_use]
pub fn adaptive_window_length(today: NaiveDate) -> usize {
    let pad = days_in_month(today).abs_diff(today.day());
    BASE_WINDOW_NIGHTS + pad as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn aligner_at(today: NaiveDate) -> CalendarAligner {
        CalendarAligner::new(Arc::new(FixedClock::new(today)))
    }

    #[test]
    fn test_align_starts_at_today() {
        let window = aligner_at(date(2024, 1, 3)).align(date(2024, 1, 1), date(2024, 1, 10), 5);

        assert_eq!(window.today_offset, 2);
        assert!(window.today_found);
        assert_eq!(
            window.day_labels,
            vec!["Jan 03 2024", "Jan 04 2024", "Jan 05 2024", "Jan 06 2024", "Jan 07 2024"]
        );
    }

    #[test]
    fn test_align_stops_at_end_of_range() {
        let window = aligner_at(date(2024, 1, 8)).align(date(2024, 1, 1), date(2024, 1, 10), 30);
        assert_eq!(window.today_offset, 7);
        assert_eq!(window.len(), 3);
        assert_eq!(window.day_labels.last().map(String::as_str), Some("Jan 10 2024"));
    }

    #[test]
    fn test_align_today_outside_range() {
        let window = aligner_at(date(2025, 6, 1)).align(date(2024, 1, 1), date(2024, 1, 10), 4);

        assert_eq!(window.today_offset, 0);
        assert!(!window.today_found);
        assert_eq!(window.day_labels[0], "Jan 01 2024");
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn test_align_inverted_range_is_empty() {
        let window = aligner_at(date(2024, 1, 5)).align(date(2024, 1, 10), date(2024, 1, 1), 5);
        assert!(window.is_empty());
        assert_eq!(window.today_offset, 0);
    }

    #[test]
    fn test_align_zero_length_window_still_finds_today() {
        let window = aligner_at(date(2024, 1, 4)).align(date(2024, 1, 1), date(2024, 1, 10), 0);
        assert!(window.is_empty());
        assert_eq!(window.today_offset, 3);
        assert!(window.today_found);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 10)), 28);
        assert_eq!(days_in_month(date(2024, 12, 31)), 31);
        assert_eq!(days_in_month(date(2024, 4, 1)), 30);
    }

    #[test]
    fn test_adaptive_window_length() {
        assert_eq!(adaptive_window_length(date(2024, 1, 31)), 366);
        assert_eq!(adaptive_window_length(date(2024, 1, 1)), 396);
        assert_eq!(adaptive_window_length(date(2024, 2, 19)), 376);
        assert_eq!(aligner_at(date(2024, 4, 20)).window_length(), 376);
    }

    #[test]
    fn test_format_day_label() {
        assert_eq!(format_day_label(date(2022, 4, 23)), "Apr 23 2022");
    }
}
