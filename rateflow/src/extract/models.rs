//! The rate summary decoded from a listing's embedded state.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Nightly rates for one listing, as published on its detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    /// First night covered by `rent_nights`.
    pub begin_date: Option<NaiveDate>,
    /// Last night covered by `rent_nights`.
    pub end_date: Option<NaiveDate>,
    /// One rate per night starting at `begin_date`.
    pub rent_nights: Vec<f64>,
    /// Currency symbol published alongside the rates.
    pub currency_symbol: Option<String>,
}

impl RateSummary {
    /// The record returned when a page carries no rate data.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the empty record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin_date.is_none() && self.end_date.is_none() && self.rent_nights.is_empty()
    }

    /// Both ends of the rate window, when both are known.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.begin_date.zip(self.end_date)
    }

    /// Decodes the `rateSummary` JSON object.
    pub(crate) fn from_json(value: &serde_json::Value) -> Result<Self, ParseError> {
        let raw = RawRateSummary::deserialize(value)
            .map_err(|e| ParseError::unexpected("rateSummary", e.to_string()))?;

        Ok(Self {
            begin_date: raw.begin_date.as_deref().map(|d| parse_date("beginDate", d)).transpose()?,
            end_date: raw.end_date.as_deref().map(|d| parse_date("endDate", d)).transpose()?,
            rent_nights: raw.rent_nights.unwrap_or_default(),
            currency_symbol: raw.currency_symbol.or(raw.currency),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRateSummary {
    #[serde(default)]
    begin_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    rent_nights: Option<Vec<f64>>,
    #[serde(default)]
    currency_symbol: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

/// Parses `YYYY-MM-DD`, falling back to the date part of an RFC 3339 datetime.
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| ParseError::unexpected(field, format!("unrecognised date '{value}'")))
}
