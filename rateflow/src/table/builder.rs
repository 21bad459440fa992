//! Row accumulation with single-shot schema widening.

use indexmap::IndexMap;
use serde::Serialize;

use super::schema::{TableSchema, LISTING_ID_COLUMN, PEAK_COLUMNS, UNIT_NAME_COLUMN};

/// One enriched listing, addressed by column id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRow {
    /// Listing id.
    pub listing_id: String,
    /// Sanitised property name.
    pub unit_name: Option<String>,
    /// Formatted price per date column id (`day0`, `day1`, ...).
    pub per_day: IndexMap<String, String>,
    /// Peak cells, largest first. At most one per peak column.
    pub peaks: Vec<String>,
}

impl OutputRow {
    /// Creates a row with no rates.
    #[must_use]
    pub fn new(listing_id: impl Into<String>, unit_name: Option<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            unit_name,
            ..Self::default()
        }
    }

    /// Value of the cell in `column_id`, if set.
    #[must_use]
    pub fn value(&self, column_id: &str) -> Option<&str> {
        match column_id {
            LISTING_ID_COLUMN => Some(self.listing_id.as_str()),
            UNIT_NAME_COLUMN => self.unit_name.as_deref(),
            _ => {
                if let Some(rank) = PEAK_COLUMNS.iter().position(|(id, _)| *id == column_id) {
                    return self.peaks.get(rank).map(String::as_str);
                }
                self.per_day.get(column_id).map(String::as_str)
            }
        }
    }
}

/// Accumulates rows for one run.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    schema: TableSchema,
    rows: Vec<OutputRow>,
}

impl TableBuilder {
    /// Creates an empty builder with the fixed columns only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row. Rows appended before widening stay valid.
    pub fn append(&mut self, row: OutputRow) {
        self.rows.push(row);
    }

    /// Adds date and peak columns the first time it is called.
    ///
    /// Returns whether this call widened the schema.
    pub fn widen_schema_once(&mut self, day_labels: &[String]) -> bool {
        self.schema.widen(day_labels)
    }

    /// Current schema.
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Owned copy of the schema, for exporters and API responses.
    #[must_use]
    pub fn snapshot_schema(&self) -> TableSchema {
        self.schema.clone()
    }

    /// Rows in append order.
    #[must_use]
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Consumes the builder.
    #[must_use]
    pub fn into_parts(self) -> (TableSchema, Vec<OutputRow>) {
        (self.schema, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Jan {:02} 2024", i + 1)).collect()
    }

    #[test]
    fn test_row_value_lookup() {
        let mut row = OutputRow::new("42", Some("Cabin".to_string()));
        row.per_day.insert("day0".to_string(), "$100".to_string());
        row.peaks = vec!["Jan 01 2024 ($300)".to_string()];

        assert_eq!(row.value("listingId"), Some("42"));
        assert_eq!(row.value("unitName"), Some("Cabin"));
        assert_eq!(row.value("day0"), Some("$100"));
        assert_eq!(row.value("day1"), None);
        assert_eq!(row.value("high1"), Some("Jan 01 2024 ($300)"));
        assert_eq!(row.value("high2"), None);
    }

    #[test]
    fn test_widening_happens_once() {
        let mut builder = TableBuilder::new();
        builder.append(OutputRow::new("1", None));

        assert!(builder.widen_schema_once(&labels(4)));
        assert!(!builder.widen_schema_once(&labels(9)));
        assert_eq!(builder.schema().len(), 2 + 4 + 3);
        assert_eq!(builder.rows().len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut builder = TableBuilder::new();
        let before = builder.snapshot_schema();
        builder.widen_schema_once(&labels(2));

        assert!(!before.is_widened());
        assert!(builder.snapshot_schema().is_widened());
    }

    #[test]
    fn test_into_parts_keeps_order() {
        let mut builder = TableBuilder::new();
        builder.append(OutputRow::new("a", None));
        builder.append(OutputRow::new("b", None));

        let (schema, rows) = builder.into_parts();
        assert!(!schema.is_widened());
        let ids: Vec<&str> = rows.iter().map(|r| r.listing_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
