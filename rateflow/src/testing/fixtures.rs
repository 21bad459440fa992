//! Detail-page fixtures.

use chrono::{Days, NaiveDate};
use serde_json::{json, Value};

use crate::fetch::DEFAULT_BASE_URL;
use crate::listing::ListingSummary;

/// A listing with id `id`, a relative detail URL and a plain headline.
#[must_use]
pub fn listing(id: &str) -> ListingSummary {
    ListingSummary::new(id, format!("/{id}")).with_headline(format!("Listing {id}"))
}

/// Absolute URL the pipeline requests for [`listing`]`(id)`.
#[must_use]
pub fn detail_url(id: &str) -> String {
    format!("{DEFAULT_BASE_URL}/{id}")
}

/// A detail page with no embedded state at all.
#[must_use]
pub fn page_without_state() -> String {
    "<html><head><title>Listing</title></head><body><p>No rates</p></body></html>".to_string()
}

/// Builds a detail page whose embedded state carries a rate summary.
#[derive(Debug, Clone, Default)]
pub struct RatePage {
    begin: Option<NaiveDate>,
    end: Option<NaiveDate>,
    nights: Vec<f64>,
    currency: Option<String>,
}

impl RatePage {
    /// Rates starting at `begin`, one per night, ending on the last rate's night.
    #[must_use]
    pub fn new(begin: NaiveDate, nights: Vec<f64>) -> Self {
        let span = u64::try_from(nights.len().saturating_sub(1)).unwrap_or(0);
        Self {
            begin: Some(begin),
            end: begin.checked_add_days(Days::new(span)),
            nights,
            currency: None,
        }
    }

    /// Rates with no begin or end date.
    #[must_use]
    pub fn without_dates(nights: Vec<f64>) -> Self {
        Self {
            nights,
            ..Self::default()
        }
    }

    /// Overrides the end date.
    #[must_use]
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the published currency symbol.
    #[must_use]
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency = Some(symbol.into());
        self
    }

    /// The embedded state object.
    #[must_use]
    pub fn state(&self) -> Value {
        let mut summary = json!({
            "beginDate": self.begin.map(|d| d.format("%Y-%m-%d").to_string()),
            "endDate": self.end.map(|d| d.format("%Y-%m-%d").to_string()),
            "rentNights": self.nights,
        });
        if let Some(currency) = &self.currency {
            summary["currencySymbol"] = json!(currency);
        }
        json!({
            "listingReducer": {
                "headline": "Fixture listing",
                "rateSummary": summary,
            }
        })
    }

    /// The full HTML document.
    #[must_use]
    pub fn html(&self) -> String {
        format!(
            "<html><head><script src=\"/app.js\"></script>\
             <script>window.__INITIAL_STATE__ = {};window.__APP__ = {{}};</script>\
             </head><body><div id=\"app\"></div></body></html>",
            self.state()
        )
    }
}
