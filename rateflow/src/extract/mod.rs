//! Embedded-state extraction from listing detail pages.
//!
//! This module provides:
//! - The [`RateSummary`] record decoded from a detail page
//! - A brace-balance scanner for inlined object literals
//! - The [`EmbeddedStateExtractor`] that ties them together

mod models;
mod scanner;
mod state;

pub use models::RateSummary;
pub use scanner::scan_object_literal;
pub use state::{EmbeddedStateExtractor, DEFAULT_RATE_SUMMARY_POINTER, DEFAULT_STATE_MARKER};
