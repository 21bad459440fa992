//! Output types of an enrichment run.

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::EmptyInputError;
use crate::table::{OutputRow, TableSchema};

/// Formatted nightly rates of one listing, keyed by day label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRateMap {
    /// Sanitised property name.
    pub unit_name: Option<String>,
    /// Day label to formatted price, in calendar order.
    pub rates: IndexMap<String, String>,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Identifier attached to the run's logs and events.
    pub run_id: String,
    /// One row per processed listing, in input order.
    pub rows: Vec<OutputRow>,
    /// One rate map per processed listing, in input order.
    pub per_listing_rate_maps: Vec<ListingRateMap>,
    /// Final column layout.
    pub schema: TableSchema,
}

impl AggregateResult {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row for `listing_id`, if it was processed.
    #[must_use]
    pub fn row(&self, listing_id: &str) -> Option<&OutputRow> {
        self.rows.iter().find(|r| r.listing_id == listing_id)
    }
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RunOutcome {
    /// At least one listing was processed.
    Completed(AggregateResult),
    /// The selection was empty; nothing was fetched.
    Empty(EmptyInputError),
}

impl RunOutcome {
    /// The result, when the run completed.
    #[must_use]
    pub fn completed(self) -> Option<AggregateResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Empty(_) => None,
        }
    }

    /// Borrowed result, when the run completed.
    #[must_use]
    pub fn as_completed(&self) -> Option<&AggregateResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Empty(_) => None,
        }
    }

    /// Whether the run had nothing to process.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}
