//! Protocol trait for detail-page fetching.

use async_trait::async_trait;

use crate::errors::FetchError;

/// Fetches the HTML of a listing's detail page.
///
/// Implementations report network failures, timeouts and non-2xx statuses as
/// [`FetchError`]; they never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
