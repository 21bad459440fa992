//! Batch progress tracking.

/// Completed-versus-total counter for the detail fetches of one run.
///
/// Only successes are counted: the first failure ends the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchProgress {
    /// Listings fetched and decoded so far.
    pub completed: usize,
    /// Listings selected for the run.
    pub total: usize,
}

impl FetchProgress {
    /// Starts at zero of `total`.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self { completed: 0, total }
    }

    /// Counts one finished listing and returns the new whole-number percentage.
    pub fn advance(&mut self) -> usize {
        self.completed = (self.completed + 1).min(self.total);
        self.floor_percent()
    }

    /// Completion percentage rounded down.
    #[must_use]
    pub fn floor_percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.completed * 100 / self.total
        }
    }
}
