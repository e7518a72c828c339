//! Canonical record type definitions

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Name used when a provider returns a hospital without one.
pub const PLACEHOLDER_NAME: &str = "Unnamed Hospital";

/// Provenance of a hospital record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    OpenStreetMap,
    GooglePlaces,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "openstreetmap",
            Self::GooglePlaces => "google_places",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hospital, normalized from a provider's raw payload
#[derive(Debug, Clone, Serialize)]
pub struct HospitalRecord {
    /// Hospital name, never empty
    pub name: String,
    /// Position of the hospital
    pub location: Coordinate,
    /// Street address or vicinity, when the provider supplies one
    pub address: Option<String>,
    /// User rating on a 0..5 scale, when the provider supplies one
    pub rating: Option<f64>,
    /// Which provider produced this record
    pub source: Source,
    /// Distance from the request anchor in km, filled by the ranker
    pub distance_km: Option<f64>,
}

impl HospitalRecord {
    /// Create a record. Empty or whitespace-only names become the placeholder.
    pub fn new(name: impl Into<String>, location: Coordinate, source: Source) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            name
        };

        Self {
            name,
            location,
            address: None,
            rating: None,
            source,
            distance_km: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach a rating, clamped into the 0..5 range.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating.clamp(0.0, 5.0));
        self
    }
}

/// Per-provider fetch timing information
#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    /// Provider name
    pub source: String,
    /// Fetch time in milliseconds
    pub time_ms: u64,
    /// Number of usable records returned
    pub record_count: usize,
}

/// Provider failure kinds
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceError {
    Timeout,
    NetworkError,
    HttpError(u16),
    ParseError,
    RateLimited,
    Unknown,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::NetworkError => write!(f, "Network error"),
            Self::HttpError(code) => write!(f, "HTTP error: {}", code),
            Self::ParseError => write!(f, "Failed to parse response"),
            Self::RateLimited => write!(f, "Too many requests"),
            Self::Unknown => write!(f, "Unknown error"),
        }
    }
}

/// A provider that failed during a discovery round
#[derive(Debug, Clone, Serialize)]
pub struct UnresponsiveSource {
    pub name: String,
    pub error: SourceError,
}
