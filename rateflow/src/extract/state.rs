//! Extraction of the inlined client state from a detail page.

use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::models::RateSummary;
use super::scanner::scan_object_literal;
use crate::errors::ParseError;

/// Assignment that introduces the inlined client state.
pub const DEFAULT_STATE_MARKER: &str = "window.__INITIAL_STATE__ =";

/// JSON pointer to the rate summary inside the decoded state.
pub const DEFAULT_RATE_SUMMARY_POINTER: &str = "/listingReducer/rateSummary";

fn script_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    #[allow(clippy::expect_used)]
    SELECTOR.get_or_init(|| Selector::parse("script").expect("static selector is valid"))
}

/// Pulls the [`RateSummary`] out of a listing detail page.
///
/// The page hydrates its client views from an object literal assigned in a
/// `<script>` element. The extractor finds the first script containing the
/// marker, scans the literal with [`scan_object_literal`], decodes it and
/// follows the rate-summary pointer.
#[derive(Debug, Clone)]
pub struct EmbeddedStateExtractor {
    marker: String,
    rate_summary_pointer: String,
}

impl Default for EmbeddedStateExtractor {
    fn default() -> Self {
        Self {
            marker: DEFAULT_STATE_MARKER.to_string(),
            rate_summary_pointer: DEFAULT_RATE_SUMMARY_POINTER.to_string(),
        }
    }
}

impl EmbeddedStateExtractor {
    /// Creates an extractor with the default marker and pointer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the marker that precedes the state literal.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the JSON pointer to the rate summary object.
    #[must_use]
    pub fn with_rate_summary_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.rate_summary_pointer = pointer.into();
        self
    }

    /// Returns the marker.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Extracts the rate summary from an HTML document.
    ///
    /// A page without the marker, or whose state has no rate summary, yields
    /// [`RateSummary::empty`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the marker is present but the literal
    /// after it cannot be scanned or decoded.
    pub fn extract(&self, html: &str) -> Result<RateSummary, ParseError> {
        let Some(script) = self.find_state_script(html) else {
            trace!(marker = %self.marker, "No embedded state script found");
            return Ok(RateSummary::empty());
        };

        self.extract_from_script(&script)
    }

    /// Extracts the rate summary from the text of a single script element.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract).
    pub fn extract_from_script(&self, script: &str) -> Result<RateSummary, ParseError> {
        let Some(marker_pos) = script.find(&self.marker) else {
            return Ok(RateSummary::empty());
        };

        let literal = scan_object_literal(script, marker_pos + self.marker.len())?;
        let state: serde_json::Value = serde_json::from_str(literal)?;

        match state.pointer(&self.rate_summary_pointer) {
            Some(serde_json::Value::Null) | None => {
                debug!(pointer = %self.rate_summary_pointer, "Embedded state has no rate summary");
                Ok(RateSummary::empty())
            }
            Some(value) => RateSummary::from_json(value),
        }
    }

    fn find_state_script(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(script_selector())
            .map(|element| element.text().collect::<String>())
            .find(|text| text.contains(&self.marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn page(script_body: &str) -> String {
        format!(
            "<html><head><script>var analytics = {{}};</script></head>\
             <body><div id=\"app\"></div><script>{script_body}</script></body></html>"
        )
    }

    #[test]
    fn test_page_without_marker_is_empty() {
        let extractor = EmbeddedStateExtractor::new();
        let summary = extractor.extract("<html><body><p>Hello</p></body></html>").unwrap();
        assert_eq!(summary, RateSummary::empty());

        let summary = extractor.extract("not even html {{{").unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_extracts_rate_summary() {
        let html = page(
            r#"window.__INITIAL_STATE__ = {"listingReducer": {"rateSummary": {"beginDate": "2024-01-01", "endDate": "2024-01-03", "rentNights": [100, 200, 150]}}};
               window.__OTHER__ = {};"#,
        );

        let summary = EmbeddedStateExtractor::new().extract(&html).unwrap();
        assert_eq!(summary.begin_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(summary.end_date, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(summary.rent_nights, vec![100.0, 200.0, 150.0]);
    }

    #[test]
    fn test_nested_braces_and_terminator_in_strings() {
        let html = page(
            r#"window.__INITIAL_STATE__ = {"listingReducer": {"description": "Great spot }; really {cozy}", "rateSummary": {"rentNights": [1, 2], "meta": {"a": {"b": 1}}}}};"#,
        );

        let summary = EmbeddedStateExtractor::new().extract(&html).unwrap();
        assert_eq!(summary.rent_nights, vec![1.0, 2.0]);
        assert!(summary.begin_date.is_none());
    }

    #[test]
    fn test_missing_rate_summary_is_empty() {
        let html = page(r#"window.__INITIAL_STATE__ = {"listingReducer": {"headline": "x"}};"#);
        assert!(EmbeddedStateExtractor::new().extract(&html).unwrap().is_empty());

        let html = page(r#"window.__INITIAL_STATE__ = {"listingReducer": {"rateSummary": null}};"#);
        assert!(EmbeddedStateExtractor::new().extract(&html).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_literal_is_parse_error() {
        let html = page(r#"window.__INITIAL_STATE__ = {"listingReducer": {rateSummary: }};"#);
        let err = EmbeddedStateExtractor::new().extract(&html).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unterminated_literal_is_parse_error() {
        let html = page(r#"window.__INITIAL_STATE__ = {"listingReducer": {"rateSummary": {}"#);
        let err = EmbeddedStateExtractor::new().extract(&html).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedLiteral { .. }));
    }

    #[test]
    fn test_custom_marker_and_pointer() {
        let extractor = EmbeddedStateExtractor::new()
            .with_marker("__STATE__=")
            .with_rate_summary_pointer("/rates");
        let summary = extractor
            .extract_from_script(r#"__STATE__={"rates": {"rentNights": [5]}}"#)
            .unwrap();
        assert_eq!(summary.rent_nights, vec![5.0]);
        assert_eq!(extractor.marker(), "__STATE__=");
    }
}
