//! Table exporters.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::builder::OutputRow;
use super::schema::TableSchema;
use crate::errors::ExportError;

/// Writes a finished table somewhere.
pub trait TableExporter: Send + Sync {
    /// Exports `rows` under `schema`. Fails if the schema was never widened.
    fn export(&self, schema: &TableSchema, rows: &[OutputRow]) -> Result<(), ExportError>;
}

/// Writes the table as CSV to a file path.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    /// Creates an exporter writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header titles and one record per row to `writer`.
    pub fn write_to<W: Write>(
        schema: &TableSchema,
        rows: &[OutputRow],
        writer: W,
    ) -> Result<(), ExportError> {
        if !schema.is_widened() {
            return Err(ExportError::SchemaNotWidened);
        }

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(schema.titles())?;

        for row in rows {
            csv.write_record(
                schema
                    .columns()
                    .iter()
                    .map(|column| row.value(&column.id).unwrap_or("")),
            )?;
        }

        csv.flush()?;
        Ok(())
    }
}

impl TableExporter for CsvExporter {
    fn export(&self, schema: &TableSchema, rows: &[OutputRow]) -> Result<(), ExportError> {
        if !schema.is_widened() {
            return Err(ExportError::SchemaNotWidened);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        debug!(path = %self.path.display(), rows = rows.len(), "Writing CSV");
        let file = fs::File::create(&self.path)?;
        Self::write_to(schema, rows, file)?;
        info!(path = %self.path.display(), rows = rows.len(), "CSV export complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableBuilder;
    use pretty_assertions::assert_eq;

    fn widened_table() -> TableBuilder {
        let mut builder = TableBuilder::new();
        builder.widen_schema_once(&["Jan 01 2024".to_string(), "Jan 02 2024".to_string()]);

        let mut row = OutputRow::new("7", Some("Lake House".to_string()));
        row.per_day.insert("day0".to_string(), "$1,200".to_string());
        row.per_day.insert("day1".to_string(), "$99.50".to_string());
        builder.append(row);
        builder.append(OutputRow::new("8", None));
        builder
    }

    #[test]
    fn test_write_to_buffer() {
        let builder = widened_table();
        let mut buffer = Vec::new();
        CsvExporter::write_to(builder.schema(), builder.rows(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Listing Id,Property Name,Jan 01 2024,Jan 02 2024,Highest Price,Second Highest Price,Third Highest Price"
        );
        assert_eq!(lines[1], "7,Lake House,\"$1,200\",$99.50,,,");
        assert_eq!(lines[2], "8,,,,,,");
    }

    #[test]
    fn test_export_requires_widened_schema() {
        let builder = TableBuilder::new();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("data.csv"));

        let result = exporter.export(builder.schema(), builder.rows());
        assert!(matches!(result, Err(ExportError::SchemaNotWidened)));
        assert!(!exporter.path().exists());
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let builder = widened_table();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("output").join("data.csv"));

        exporter.export(builder.schema(), builder.rows()).unwrap();

        let text = std::fs::read_to_string(exporter.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("Listing Id,Property Name"));
    }
}
