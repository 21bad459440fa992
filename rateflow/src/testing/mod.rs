//! Testing utilities for enrichment runs.
//!
//! This module provides:
//! - [`StaticFetcher`], an in-memory [`Fetcher`](crate::fetch::Fetcher)
//! - Detail-page fixtures carrying an embedded rate summary

mod fixtures;
mod mocks;

pub use fixtures::{detail_url, listing, page_without_state, RatePage};
pub use mocks::StaticFetcher;
