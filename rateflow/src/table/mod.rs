//! Tabular output with a lazily discovered column schema.
//!
//! This module provides:
//! - [`TableSchema`]: fixed columns, then date and peak columns once known
//! - [`TableBuilder`]: row accumulation and single-shot schema widening
//! - [`TableExporter`] and the csv-backed [`CsvExporter`]
//! - Price formatting for cell values

mod builder;
mod export;
mod format;
mod schema;

pub use builder::{OutputRow, TableBuilder};
pub use export::{CsvExporter, TableExporter};
pub use format::format_price;
pub use schema::{
    day_column_id, Column, TableSchema, FIXED_COLUMN_COUNT, LISTING_ID_COLUMN, PEAK_COLUMNS,
    UNIT_NAME_COLUMN,
};
