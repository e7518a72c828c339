//! Google Places hospital provider
//!
//! Uses the Places Nearby Search API with `type=hospital`. Requires an API
//! key; the loader skips this provider when no key is configured.

use super::traits::*;
use crate::geo::Coordinate;
use crate::results::{HospitalRecord, Source};
use anyhow::Result as AnyhowResult;

/// Google Places Nearby Search provider
pub struct GooglePlaces {
    api_url: String,
    api_key: String,
}

impl GooglePlaces {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Use an alternate endpoint (tests).
    pub fn with_endpoint(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Provider for GooglePlaces {
    fn name(&self) -> &str {
        "google_places"
    }

    fn source(&self) -> Source {
        Source::GooglePlaces
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://developers.google.com/maps/documentation/places")
            .official_api(true)
            .api_key_required(true)
            .results_format("JSON")
    }

    fn request(&self, params: &FetchParams) -> AnyhowResult<ProviderRequest> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!("Google Places API key is not configured"));
        }

        let request = ProviderRequest::get(&self.api_url)
            .param(
                "location",
                format!("{},{}", params.anchor.lat(), params.anchor.lon()),
            )
            .param("radius", params.radius_m.to_string())
            .param("type", "hospital")
            .param("key", self.api_key.clone());

        Ok(request)
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<HospitalRecord>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = serde_json::from_str(&response.text)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        // The Places API reports its own status inside the body.
        let status = json
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("UNKNOWN");
        match status {
            "OK" | "ZERO_RESULTS" => {}
            "OVER_QUERY_LIMIT" => return Err(anyhow::anyhow!("429 quota exceeded")),
            other => return Err(anyhow::anyhow!("Places API status: {}", other)),
        }

        let places = json
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();

        let mut records = Vec::new();

        for place in places {
            let position = place
                .get("geometry")
                .and_then(|g| g.get("location"))
                .and_then(|l| {
                    let lat = l.get("lat").and_then(|v| v.as_f64())?;
                    let lng = l.get("lng").and_then(|v| v.as_f64())?;
                    Some((lat, lng))
                });
            let Some((lat, lng)) = position else {
                continue;
            };
            let Ok(location) = Coordinate::new(lat, lng) else {
                continue;
            };

            let name = place
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or_default();

            let mut record = HospitalRecord::new(name, location, self.source());

            if let Some(vicinity) = place.get("vicinity").and_then(|v| v.as_str()) {
                record = record.with_address(vicinity);
            }
            if let Some(rating) = place.get("rating").and_then(|r| r.as_f64()) {
                record = record.with_rating(rating);
            }

            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params() -> FetchParams {
        FetchParams::new(Coordinate::new(12.9716, 77.5946).unwrap(), 5000)
    }

    fn response_with(body: &str) -> ProviderResponse {
        ProviderResponse {
            status: 200,
            headers: HashMap::new(),
            text: body.to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn test_google_request() {
        let google = GooglePlaces::new("test-key");
        let request = google.request(&params()).unwrap();

        assert!(request.url.contains("maps.googleapis.com"));
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.params.get("location"),
            Some(&"12.9716,77.5946".to_string())
        );
        assert_eq!(request.params.get("radius"), Some(&"5000".to_string()));
        assert_eq!(request.params.get("type"), Some(&"hospital".to_string()));
        assert_eq!(request.params.get("key"), Some(&"test-key".to_string()));
    }

    #[test]
    fn test_google_request_without_key() {
        let google = GooglePlaces::new("");
        assert!(google.request(&params()).is_err());
    }

    #[test]
    fn test_google_parse() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"name": "Manipal Hospital",
                 "geometry": {"location": {"lat": 12.96, "lng": 77.64}},
                 "vicinity": "98 HAL Old Airport Rd",
                 "rating": 4.3},
                {"name": "No Geometry Clinic"}
            ]
        }"#;

        let google = GooglePlaces::new("test-key");
        let records = google.response(response_with(body)).unwrap();

        // The entry without a position is dropped silently.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Manipal Hospital");
        assert_eq!(records[0].source, Source::GooglePlaces);
        assert_eq!(records[0].address.as_deref(), Some("98 HAL Old Airport Rd"));
        assert_eq!(records[0].rating, Some(4.3));
    }

    #[test]
    fn test_google_zero_results() {
        let body = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let google = GooglePlaces::new("test-key");
        let records = google.response(response_with(body)).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_google_error_status() {
        let body = r#"{"status": "REQUEST_DENIED", "results": []}"#;
        let google = GooglePlaces::new("test-key");
        assert!(google.response(response_with(body)).is_err());
    }
}
