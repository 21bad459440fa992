//! # Rateflow
//!
//! Enriches short-rental listing summaries with the nightly-rate calendars
//! published on each listing's detail page.
//!
//! A run:
//!
//! - **Fetches** every selected detail page on a bounded worker pool
//! - **Extracts** the rate summary embedded in the page's inline state script
//! - **Aligns** the rates against today using an adaptive lookout window
//! - **Selects** the three highest nightly rates
//! - **Builds** a table whose date columns are discovered from the first
//!   listing with a calendar, ready for CSV export
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rateflow::prelude::*;
//! use std::sync::Arc;
//!
//! let config = RateflowConfig::from_json_file("rateflow.json")?;
//! let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone())?);
//! let pipeline = EnrichmentPipeline::from_config(fetcher, &config);
//!
//! let exporter = CsvExporter::new(&config.export.output_path);
//! let outcome = pipeline
//!     .run_and_export(&listings, config.pipeline.target_count, &exporter)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod calendar;
pub mod cancellation;
pub mod config;
pub mod errors;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod observability;
pub mod peaks;
pub mod pipeline;
pub mod table;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calendar::{CalendarAligner, CalendarWindow, Clock, FixedClock, SystemClock};
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{ExportConfig, LoggingConfig, PipelineConfig, RateflowConfig};
    pub use crate::errors::{EmptyInputError, ExportError, FetchError, ParseError, RateflowError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::extract::{EmbeddedStateExtractor, RateSummary};
    #[cfg(feature = "http")]
    pub use crate::fetch::HttpFetcher;
    pub use crate::fetch::{FetchConfig, FetchProgress, Fetcher};
    pub use crate::listing::{listings_from_json, ListingSummary};
    pub use crate::observability::init_logging;
    pub use crate::peaks::{top_n, PeakEntry, TopN};
    pub use crate::pipeline::{AggregateResult, EnrichmentPipeline, ListingRateMap, RunOutcome};
    pub use crate::table::{CsvExporter, OutputRow, TableBuilder, TableExporter, TableSchema};
}
