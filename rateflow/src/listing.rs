//! Listing summaries supplied by the search collaborator.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// A listing as returned by the search API, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    /// Property identifier.
    pub id: String,
    /// Marketing headline, if the listing has one.
    pub headline: Option<String>,
    /// Detail page URL, absolute or relative to the site root.
    pub detail_url: String,
}

impl ListingSummary {
    /// Creates a new listing summary.
    #[must_use]
    pub fn new(id: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headline: None,
            detail_url: detail_url.into(),
        }
    }

    /// Sets the headline.
    #[must_use]
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    /// The headline with non-ASCII characters removed and whitespace trimmed.
    ///
    /// Returns `None` when the listing has no headline.
    #[must_use]
    pub fn unit_name(&self) -> Option<String> {
        self.headline.as_deref().map(sanitize_unit_name)
    }
}

/// Strips non-ASCII characters and trims the result.
#[must_use]
pub fn sanitize_unit_name(headline: &str) -> String {
    static NON_ASCII: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    let re = NON_ASCII.get_or_init(|| Regex::new(r"[^\x00-\x7F]").expect("static pattern is valid"));
    re.replace_all(headline, "").trim().to_string()
}

/// Wire shapes accepted for a listing summary.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingWire {
    Search {
        #[serde(rename = "propertyId")]
        property_id: IdValue,
        #[serde(rename = "propertyMetadata", default)]
        property_metadata: Option<PropertyMetadata>,
        #[serde(rename = "detailPageUrl")]
        detail_page_url: String,
    },
    Plain {
        id: IdValue,
        #[serde(default)]
        headline: Option<String>,
        #[serde(rename = "detailUrl")]
        detail_url: String,
    },
}

#[derive(Deserialize)]
struct PropertyMetadata {
    #[serde(default)]
    headline: Option<String>,
}

/// Property ids arrive as strings or bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdValue> for String {
    fn from(value: IdValue) -> Self {
        match value {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for ListingSummary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match ListingWire::deserialize(deserializer)? {
            ListingWire::Search {
                property_id,
                property_metadata,
                detail_page_url,
            } => Self {
                id: property_id.into(),
                headline: property_metadata.and_then(|m| m.headline),
                detail_url: detail_page_url,
            },
            ListingWire::Plain {
                id,
                headline,
                detail_url,
            } => Self {
                id: id.into(),
                headline,
                detail_url,
            },
        })
    }
}

/// Decodes listings from a search response.
///
/// Accepts either a bare array of listings or the search envelope
/// `{"data": {"results": {"listings": [...]}}}`.
pub fn listings_from_json(json: &str) -> Result<Vec<ListingSummary>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let listings = value
        .pointer("/data/results/listings")
        .cloned()
        .unwrap_or(value);
    serde_json::from_value(listings)
}
