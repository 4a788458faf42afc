// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Type definitions

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default catalog API host
pub const DEFAULT_API_BASE_URL: &str = "https://65e178bfa8583365b31672f8.mockapi.io";

/// Brands carried by the catalog, in the order the filter bar shows them
pub const KNOWN_COMPANIES: [&str; 6] = [
    "Bandai",
    "Banpresto",
    "Good Smile Company",
    "Hot Toys",
    "Dark Horse",
    "McFarlane Toys",
];

/// Stable catalog identifier.
///
/// The remote API sends ids as strings, but numeric ids are accepted too so
/// `1` and `"1"` name the same toy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ToyId(String);

impl ToyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ToyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ToyId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ToyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        })
    }
}

/// A single customer review attached to a toy.
///
/// Reviews are display-only, so a missing or odd field never rejects the toy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Star rating, 1 to 5
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub author: String,
    /// None when the API sent no date or one that could not be read
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339, a naive timestamp, a bare `YYYY-MM-DD` date or epoch
/// milliseconds; anything else becomes None.
fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Millis(i64),
        Other(serde_json::Value),
    }

    Ok(match RawDate::deserialize(deserializer)? {
        RawDate::Text(text) => parse_date_text(text.trim()),
        RawDate::Millis(millis) => Utc.timestamp_millis_opt(millis).single(),
        RawDate::Other(_) => None,
    })
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl FeedbackEntry {
    /// Rating clamped to the displayable 1..=5 star range
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

/// Catalog entry as returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    pub id: ToyId,
    pub toy_name: String,
    pub company: String,
    pub price: f64,
    /// Discount fraction; 0 means no deal, 0.25 means 25% off
    #[serde(default)]
    pub limited_time_deal: f64,
    #[serde(default)]
    pub toy_description: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sold_out: bool,
    #[serde(default)]
    pub comments: Vec<FeedbackEntry>,
}

impl Toy {
    pub fn has_deal(&self) -> bool {
        self.limited_time_deal > 0.0
    }

    /// Whole-percent discount for the "N% Off!" badge
    pub fn deal_percent(&self) -> u32 {
        if !self.has_deal() {
            return 0;
        }
        (self.limited_time_deal * 100.0).floor() as u32
    }

    /// Price after the limited time deal, or the list price without one
    pub fn discounted_price(&self) -> f64 {
        if self.has_deal() {
            self.price * (1.0 - self.limited_time_deal)
        } else {
            self.price
        }
    }

    pub fn is_available(&self) -> bool {
        !self.sold_out
    }
}

/// Category selector for the catalog filter bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CompanyFilter {
    /// No brand restriction
    #[default]
    All,
    /// Exactly one brand
    Company(String),
}

impl CompanyFilter {
    /// Parse a filter-bar label; "All" is the sentinel, anything else a brand
    pub fn parse(label: &str) -> Self {
        if label == "All" {
            Self::All
        } else {
            Self::Company(label.to_string())
        }
    }

    /// Sentinel followed by every known brand, in display order
    pub fn known() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(KNOWN_COMPANIES.iter().map(|c| Self::Company(c.to_string())))
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Company(company) => company,
        }
    }

    /// Check if a toy passes the brand restriction
    pub fn matches(&self, toy: &Toy) -> bool {
        match self {
            Self::All => true,
            Self::Company(company) => toy.company == *company,
        }
    }
}

/// Application settings (GUI-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Catalog API base URL, without the `/ListOfToys` path
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds. None waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Key-value storage file. None uses the platform data directory.
    #[serde(default)]
    pub storage_file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
            storage_file: None,
        }
    }
}

impl AppSettings {
    /// Reject settings the catalog client cannot work with
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidConfig("API base URL is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::InvalidConfig(format!(
                "API base URL must be http or https: {}",
                url
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "Connect timeout must be at least one second".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(AppError::InvalidConfig(
                "Request timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
