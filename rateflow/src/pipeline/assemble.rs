//! Ordered finalisation of fetched listings into table rows.

use indexmap::IndexMap;
use serde_json::json;
use tracing::{debug, info};

use super::models::ListingRateMap;
use crate::calendar::CalendarWindow;
use crate::events::{EventSink, SCHEMA_WIDENED};
use crate::extract::RateSummary;
use crate::listing::ListingSummary;
use crate::peaks::{top_n, DEFAULT_PEAK_COUNT};
use crate::table::{day_column_id, format_price, OutputRow, TableBuilder, TableSchema};

/// A listing whose detail page has been fetched and decoded.
#[derive(Debug, Clone)]
pub(crate) struct FetchedListing {
    pub index: usize,
    pub listing: ListingSummary,
    pub url: String,
    pub summary: RateSummary,
    /// Present only when the summary carried both dates.
    pub window: Option<CalendarWindow>,
}

/// Rows, rate maps and schema built from listings in input order.
pub(crate) struct Assembled {
    pub schema: TableSchema,
    pub rows: Vec<OutputRow>,
    pub rate_maps: Vec<ListingRateMap>,
}

/// Builds the table from `fetched`, which must already be in input order.
///
/// The first listing with dates fixes the date columns. Every listing with
/// dates is then sliced from its own today offset for at most that many
/// nights.
pub(crate) fn assemble(
    fetched: Vec<FetchedListing>,
    default_symbol: &str,
    run_id: &str,
    sink: &dyn EventSink,
) -> Assembled {
    let mut builder = TableBuilder::new();
    let mut rate_maps = Vec::with_capacity(fetched.len());

    for item in fetched {
        let unit_name = item.listing.unit_name();
        let mut row = OutputRow::new(item.listing.id.clone(), unit_name.clone());
        let mut rates = IndexMap::new();

        if let Some(window) = &item.window {
            if builder.widen_schema_once(&window.day_labels) {
                info!(
                    run_id,
                    listing_id = %item.listing.id,
                    date_columns = window.len(),
                    "Table schema widened"
                );
                sink.try_emit(
                    SCHEMA_WIDENED,
                    Some(json!({
                        "runId": run_id,
                        "listingId": &item.listing.id,
                        "dateColumns": window.len(),
                    })),
                );
            }

            let schema = builder.schema();
            let symbol = item
                .summary
                .currency_symbol
                .as_deref()
                .unwrap_or(default_symbol);
            let nights = visible_nights(
                &item.summary.rent_nights,
                window.today_offset,
                schema.date_column_count(),
            );

            for (i, price) in nights.iter().enumerate() {
                let formatted = format_price(*price, symbol);
                if let Some(label) = schema.day_title(i) {
                    rates.insert(label.to_string(), formatted.clone());
                }
                row.per_day.insert(day_column_id(i), formatted);
            }

            if !nights.is_empty() {
                row.peaks = top_n(nights, DEFAULT_PEAK_COUNT)
                    .descending()
                    .iter()
                    .map(|peak| {
                        let label = schema.day_title(peak.original_index).unwrap_or_default();
                        format!("{label} ({})", format_price(peak.value, symbol))
                    })
                    .collect();
            }
        } else {
            debug!(run_id, listing_id = %item.listing.id, "Listing has no rate calendar");
        }

        builder.append(row);
        rate_maps.push(ListingRateMap { unit_name, rates });
    }

    let (schema, rows) = builder.into_parts();
    Assembled {
        schema,
        rows,
        rate_maps,
    }
}

/// Up to `width` rates starting at `offset`.
fn visible_nights(rent_nights: &[f64], offset: usize, width: usize) -> &[f64] {
    match rent_nights.get(offset..) {
        Some(rest) => &rest[..rest.len().min(width)],
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoOpEventSink;
    use pretty_assertions::assert_eq;

    fn window(labels: &[&str], today_offset: usize) -> CalendarWindow {
        CalendarWindow {
            day_labels: labels.iter().map(|l| (*l).to_string()).collect(),
            today_offset,
            today_found: true,
        }
    }

    fn fetched(index: usize, nights: Vec<f64>, window: Option<CalendarWindow>) -> FetchedListing {
        FetchedListing {
            index,
            listing: ListingSummary::new(index.to_string(), format!("/{index}"))
                .with_headline(format!("Unit {index}")),
            url: format!("https://www.vrbo.com/{index}"),
            summary: RateSummary {
                rent_nights: nights,
                ..RateSummary::default()
            },
            window,
        }
    }

    #[test]
    fn test_visible_nights() {
        let nights = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(visible_nights(&nights, 2, 2), &[3.0, 4.0]);
        assert_eq!(visible_nights(&nights, 3, 10), &[4.0, 5.0]);
        assert!(visible_nights(&nights, 5, 3).is_empty());
        assert!(visible_nights(&nights, 9, 3).is_empty());
    }

    #[test]
    fn test_rows_and_peaks() {
        let labels = ["Jan 03 2024", "Jan 04 2024", "Jan 05 2024", "Jan 06 2024"];
        let assembled = assemble(
            vec![fetched(0, vec![90.0, 95.0, 100.0, 300.0, 250.0, 1250.0], Some(window(&labels, 2)))],
            "$",
            "run",
            &NoOpEventSink,
        );

        assert_eq!(assembled.schema.len(), 2 + 4 + 3);
        let row = &assembled.rows[0];
        assert_eq!(row.value("day0"), Some("$100"));
        assert_eq!(row.value("day3"), Some("$1,250"));
        assert_eq!(
            row.peaks,
            vec!["Jan 06 2024 ($1,250)", "Jan 04 2024 ($300)", "Jan 05 2024 ($250)"]
        );
        assert_eq!(assembled.rate_maps[0].rates.get("Jan 03 2024").map(String::as_str), Some("$100"));
        assert_eq!(assembled.rate_maps[0].unit_name.as_deref(), Some("Unit 0"));
    }

    #[test]
    fn test_short_slice_is_unranked() {
        let labels = ["Jan 03 2024", "Jan 04 2024"];
        let assembled = assemble(
            vec![fetched(0, vec![80.0, 90.0], Some(window(&labels, 0)))],
            "$",
            "run",
            &NoOpEventSink,
        );

        let row = &assembled.rows[0];
        assert_eq!(row.per_day.len(), 2);
        assert!(row.peaks.is_empty());
        assert_eq!(row.value("high1"), None);
    }

    #[test]
    fn test_listing_without_dates_keeps_row() {
        let assembled = assemble(vec![fetched(0, vec![10.0; 5], None)], "$", "run", &NoOpEventSink);

        assert!(!assembled.schema.is_widened());
        assert_eq!(assembled.rows.len(), 1);
        assert!(assembled.rows[0].per_day.is_empty());
        assert!(assembled.rate_maps[0].rates.is_empty());
    }
}
