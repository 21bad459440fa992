//! Configuration for detail-page fetching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::errors::FetchError;

/// Site that relative detail URLs are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://www.vrbo.com";

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL for relative detail URLs; also sent as `Referer`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Headers sent with every request.
    #[serde(default = "default_headers")]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Referer".to_string(), DEFAULT_BASE_URL.to_string()),
        ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
    ])
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            headers: default_headers(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL and the matching `Referer` header.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.headers
            .insert("Referer".to_string(), self.base_url.clone());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Resolves a detail URL, which may be relative, against the base URL.
    pub fn resolve_url(&self, detail_url: &str) -> Result<String, FetchError> {
        if let Ok(absolute) = Url::parse(detail_url) {
            return Ok(absolute.into());
        }

        let invalid = |e: url::ParseError| FetchError::InvalidUrl {
            url: detail_url.to_string(),
            message: e.to_string(),
        };
        let base = Url::parse(&self.base_url).map_err(invalid)?;
        Ok(base.join(detail_url).map_err(invalid)?.into())
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0) {
            return Err(format!(
                "fetch.timeout_seconds must be positive, got {}",
                self.timeout_seconds
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| format!("fetch.base_url {:?} is invalid: {e}", self.base_url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::new();
        assert_eq!(config.base_url, "https://www.vrbo.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.headers.get("Referer").map(String::as_str), Some("https://www.vrbo.com"));
        assert_eq!(
            config.headers.get("X-Requested-With").map(String::as_str),
            Some("XMLHttpRequest")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = FetchConfig::new();
        assert_eq!(
            config.resolve_url("/1234567ha").unwrap(),
            "https://www.vrbo.com/1234567ha"
        );
        assert_eq!(
            config.resolve_url("https://example.com/a?b=1").unwrap(),
            "https://example.com/a?b=1"
        );
    }

    #[test]
    fn test_resolve_with_bad_base() {
        let config = FetchConfig::new().with_base_url("not a url");
        let err = config.resolve_url("/x").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = FetchConfig::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(2.5)
            .with_user_agent("rateflow-test")
            .with_header("Accept", "text/html");

        assert_eq!(config.headers["Referer"], "http://localhost:8080");
        assert_eq!(config.headers["Accept"], "text/html");
        assert_eq!(config.user_agent, "rateflow-test");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        assert!(FetchConfig::new().with_timeout(0.0).validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: FetchConfig = serde_json::from_str(r#"{"timeout_seconds": 5}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5.0);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.headers.len(), 2);
    }
}
