//! Detail-page fetching.
//!
//! This module provides:
//! - The [`Fetcher`] trait the pipeline calls once per listing
//! - [`FetchConfig`] with base URL, timeout and default headers
//! - A reqwest-backed [`HttpFetcher`] (feature `http`)
//! - [`FetchProgress`] for batch progress reporting

mod config;
#[cfg(feature = "http")]
mod http;
mod progress;
mod protocols;

pub use config::{FetchConfig, DEFAULT_BASE_URL};
#[cfg(feature = "http")]
pub use http::HttpFetcher;
pub use progress::FetchProgress;
pub use protocols::Fetcher;

#[cfg(test)]
pub use protocols::MockFetcher;
