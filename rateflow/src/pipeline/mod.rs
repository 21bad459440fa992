//! The listing enrichment pipeline.
//!
//! This module provides:
//! - [`EnrichmentPipeline`]: bounded concurrent fetch, extract and align per
//!   listing, then an ordered finalisation into table rows
//! - [`AggregateResult`] and [`RunOutcome`], the output of a run
//! - [`ListingRateMap`], the per-listing date to rate mapping for API callers

mod assemble;
mod enrichment;
mod models;

pub use enrichment::EnrichmentPipeline;
pub use models::{AggregateResult, ListingRateMap, RunOutcome};
