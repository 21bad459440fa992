//! Column schema for the output table.

use serde::Serialize;

/// Id of the listing id column.
pub const LISTING_ID_COLUMN: &str = "listingId";

/// Id of the property name column.
pub const UNIT_NAME_COLUMN: &str = "unitName";

/// Number of columns present before widening.
pub const FIXED_COLUMN_COUNT: usize = 2;

/// Peak columns, largest first, appended after the date columns.
pub const PEAK_COLUMNS: [(&str, &str); 3] = [
    ("high1", "Highest Price"),
    ("high2", "Second Highest Price"),
    ("high3", "Third Highest Price"),
];

/// Id of the `index`-th date column.
#[must_use]
pub fn day_column_id(index: usize) -> String {
    format!("day{index}")
}

/// A single output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Key used to address row values.
    pub id: String,
    /// Header text.
    pub title: String,
}

impl Column {
    /// Creates a new column.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Ordered output columns.
///
/// Starts with the two fixed columns. Widening appends one column per day
/// label and then the peak columns, and can happen only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    columns: Vec<Column>,
    date_column_count: usize,
    widened: bool,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            columns: vec![
                Column::new(LISTING_ID_COLUMN, "Listing Id"),
                Column::new(UNIT_NAME_COLUMN, "Property Name"),
            ],
            date_column_count: 0,
            widened: false,
        }
    }
}

impl TableSchema {
    /// Creates a schema holding only the fixed columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; the fixed columns are never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether date and peak columns have been added.
    #[must_use]
    pub fn is_widened(&self) -> bool {
        self.widened
    }

    /// Number of date columns (W).
    #[must_use]
    pub fn date_column_count(&self) -> usize {
        self.date_column_count
    }

    /// Header text of the `index`-th date column.
    #[must_use]
    pub fn day_title(&self, index: usize) -> Option<&str> {
        if index >= self.date_column_count {
            return None;
        }
        self.columns
            .get(FIXED_COLUMN_COUNT + index)
            .map(|c| c.title.as_str())
    }

    /// Header texts in column order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }

    /// Appends date and peak columns. Returns false if already widened.
    pub(crate) fn widen(&mut self, day_labels: &[String]) -> bool {
        if self.widened {
            return false;
        }

        self.columns.extend(
            day_labels
                .iter()
                .enumerate()
                .map(|(i, label)| Column::new(day_column_id(i), label.clone())),
        );
        self.columns
            .extend(PEAK_COLUMNS.iter().map(|(id, title)| Column::new(*id, *title)));
        self.date_column_count = day_labels.len();
        self.widened = true;
        true
    }
}
