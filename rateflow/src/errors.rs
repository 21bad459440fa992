//! Error types for the rateflow pipeline.
//!
//! Failures are split by where they originate: detail-page retrieval
//! ([`FetchError`]), embedded-state decoding ([`ParseError`]) and table export
//! ([`ExportError`]). The orchestrator folds them into [`RateflowError`], which
//! names the listing that caused the run to abort.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for a pipeline run.
#[derive(Debug, Error)]
pub enum RateflowError {
    /// Retrieving a listing's detail page failed.
    #[error("Error while getting listing info for listing '{listing_id}' ({url}): {source}")]
    Fetch {
        /// The listing being processed.
        listing_id: String,
        /// The detail URL that was requested.
        url: String,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The embedded state of a listing's detail page could not be decoded.
    #[error("Error while parsing listing '{listing_id}': {source}")]
    Parse {
        /// The listing being processed.
        listing_id: String,
        /// The underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// Writing the tabular output failed.
    #[error("{0}")]
    Export(#[from] ExportError),

    /// The run was cancelled before it completed.
    #[error("Run cancelled: {0}")]
    Cancelled(String),

    /// Configuration was invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RateflowError {
    /// Short machine-readable kind, used in API error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "FetchError",
            Self::Parse { .. } => "ParseError",
            Self::Export(_) => "ExportError",
            Self::Cancelled(_) => "Cancelled",
            Self::Config(_) => "ConfigError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// The listing the error is attributed to, if any.
    #[must_use]
    pub fn listing_id(&self) -> Option<&str> {
        match self {
            Self::Fetch { listing_id, .. } | Self::Parse { listing_id, .. } => Some(listing_id),
            _ => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));

        match self {
            Self::Fetch { listing_id, url, source } => {
                map.insert("listing_id".to_string(), serde_json::json!(listing_id));
                map.insert("url".to_string(), serde_json::json!(url));
                if let Some(status) = source.status_code() {
                    map.insert("status_code".to_string(), serde_json::json!(status));
                }
            }
            Self::Parse { listing_id, .. } => {
                map.insert("listing_id".to_string(), serde_json::json!(listing_id));
            }
            _ => {}
        }

        map
    }
}

/// Errors raised while retrieving a detail page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The connection failed or the body could not be read.
    #[error("Network error for {url}: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// The transport error message.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out after {timeout_seconds}s")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The timeout that elapsed.
        timeout_seconds: f64,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The detail URL could not be resolved against the base URL.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Creates a network error.
    #[must_use]
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Returns the HTTP status for status errors.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while decoding the embedded state of a detail page.
///
/// A page without the state marker is not an error; these only occur once the
/// marker has been found.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// No object literal follows the state marker.
    #[error("No object literal follows the state marker")]
    MissingObject,

    /// The object literal is never closed.
    #[error("Embedded state literal is unterminated (opened at byte {start})")]
    UnterminatedLiteral {
        /// Byte offset of the opening brace within the script text.
        start: usize,
    },

    /// The literal is not valid JSON.
    #[error("Embedded state is not valid JSON: {0}")]
    Json(String),

    /// The JSON decoded but a field has an unexpected shape.
    #[error("Unexpected shape for '{field}': {message}")]
    UnexpectedShape {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },
}

impl ParseError {
    /// Creates an unexpected-shape error.
    #[must_use]
    pub fn unexpected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Errors raised by a table exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export was requested before any listing supplied date columns.
    #[error("Cannot export: table schema has no date columns (no listing carried a rate calendar)")]
    SchemaNotWidened,

    /// The CSV writer failed.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Creating or flushing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The typed "no results" outcome of a run over an empty batch.
///
/// This is an expected steady state rather than a failure, so the pipeline
/// returns it inside `Ok`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Listings array is empty: {reason}")]
pub struct EmptyInputError {
    /// Why no listing was processed.
    pub reason: String,
}

impl EmptyInputError {
    /// Creates a new empty-input outcome.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
