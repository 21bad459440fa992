//! Sources of the current calendar day.

use chrono::{Local, NaiveDate};

/// Supplies the current calendar day.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    /// Creates a clock that always reports `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(FixedClock::new(day).today(), day);
    }

    #[test]
    fn test_system_clock_is_close_to_utc() {
        let today = SystemClock.today();
        let utc = chrono::Utc::now().date_naive();
        assert!((today - utc).num_days().abs() <= 1);
    }
}
