//! Run events for observability.
//!
//! This module provides:
//! - The [`EventSink`] trait the pipeline reports to
//! - Logging, no-op and collecting sinks
//! - Names of the events a run emits

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Emitted once a run has selected its listings.
pub const RUN_STARTED: &str = "run.started";
/// Emitted after each listing's detail page has been fetched and decoded.
pub const LISTING_COMPLETED: &str = "listing.completed";
/// Emitted when the table schema gains its date and peak columns.
pub const SCHEMA_WIDENED: &str = "schema.widened";
/// Emitted when a run produced a result.
pub const RUN_COMPLETED: &str = "run.completed";
/// Emitted when a run aborted with an error.
pub const RUN_FAILED: &str = "run.failed";
