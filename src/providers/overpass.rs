//! Overpass (OpenStreetMap) hospital provider
//!
//! Queries the Overpass API for nodes, ways, and relations tagged
//! `amenity=hospital` around the anchor. Ways and relations carry their
//! position in a `center` object, requested via `out center`.

use super::traits::*;
use crate::geo::Coordinate;
use crate::results::{HospitalRecord, Source};
use anyhow::Result as AnyhowResult;
use std::collections::HashMap;

/// Overpass API provider for OpenStreetMap hospital data
pub struct Overpass {
    api_url: String,
}

impl Overpass {
    pub fn new() -> Self {
        Self {
            api_url: "https://overpass-api.de/api/interpreter".to_string(),
        }
    }

    /// Use an alternate interpreter endpoint (mirrors, tests).
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self { api_url: url.into() }
    }

    /// Build the Overpass QL union query for an anchor and radius.
    fn build_query(params: &FetchParams) -> String {
        let lat = params.anchor.lat();
        let lon = params.anchor.lon();
        let r = params.radius_m;

        format!(
            "[out:json];(\
             node[\"amenity\"=\"hospital\"](around:{r},{lat},{lon});\
             way[\"amenity\"=\"hospital\"](around:{r},{lat},{lon});\
             relation[\"amenity\"=\"hospital\"](around:{r},{lat},{lon});\
             );out center;"
        )
    }

    /// Pull a position out of an element: nodes carry `lat`/`lon` directly,
    /// ways and relations carry a `center` object.
    fn element_position(element: &serde_json::Value) -> Option<(f64, f64)> {
        let lat = element
            .get("lat")
            .and_then(|v| v.as_f64())
            .or_else(|| {
                element
                    .get("center")
                    .and_then(|c| c.get("lat"))
                    .and_then(|v| v.as_f64())
            })?;
        let lon = element
            .get("lon")
            .and_then(|v| v.as_f64())
            .or_else(|| {
                element
                    .get("center")
                    .and_then(|c| c.get("lon"))
                    .and_then(|v| v.as_f64())
            })?;
        Some((lat, lon))
    }
}

impl Default for Overpass {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Overpass {
    fn name(&self) -> &str {
        "overpass"
    }

    fn source(&self) -> Source {
        Source::OpenStreetMap
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://overpass-api.de")
            .official_api(true)
            .results_format("JSON")
    }

    fn request(&self, params: &FetchParams) -> AnyhowResult<ProviderRequest> {
        let mut form = HashMap::new();
        form.insert("data".to_string(), Self::build_query(params));

        Ok(ProviderRequest::post(&self.api_url).form(form))
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<HospitalRecord>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = serde_json::from_str(&response.text)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        let elements = json
            .get("elements")
            .and_then(|e| e.as_array())
            .cloned()
            .unwrap_or_default();

        let mut records = Vec::new();

        for element in elements {
            let Some((lat, lon)) = Self::element_position(&element) else {
                continue;
            };
            // Out-of-range coordinates from a malformed element are dropped
            // along with coordinate-less ones.
            let Ok(location) = Coordinate::new(lat, lon) else {
                continue;
            };

            let name = element
                .get("tags")
                .and_then(|t| t.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or_default();

            records.push(HospitalRecord::new(name, location, self.source()));
        }

        Ok(records)
    }
}
