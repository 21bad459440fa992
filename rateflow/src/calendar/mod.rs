//! Calendar alignment of nightly-rate windows.
//!
//! This module provides:
//! - An injectable [`Clock`] for "today"
//! - The [`CalendarAligner`] that maps a rate window onto day labels
//! - The adaptive lookout window policy

mod aligner;
mod clock;

pub use aligner::{
    adaptive_window_length, days_in_month, format_day_label, CalendarAligner, CalendarWindow,
};
pub use clock::{Clock, FixedClock, SystemClock};
