//! HTTP request handlers

use super::state::AppState;
use crate::discovery::{DiscoveryError, DiscoveryOutcome, DiscoveryRequest};
use crate::geo::Coordinate;
use crate::results::{HospitalRecord, Timing, UnresponsiveSource};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for discovery
#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    /// Anchor latitude
    pub lat: Option<f64>,
    /// Anchor longitude
    pub lon: Option<f64>,
    /// Search radius in meters
    pub radius: Option<u32>,
    /// Maximum number of records returned
    pub limit: Option<usize>,
}

/// Discovery response for JSON format
#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub anchor: Coordinate,
    pub count: usize,
    pub total_found: usize,
    pub from_cache: bool,
    pub hospitals: Vec<HospitalResponse>,
    pub unresponsive_sources: Vec<UnresponsiveSource>,
    pub timings: Vec<Timing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HospitalResponse {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: Option<f64>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub source: String,
}

impl From<HospitalRecord> for HospitalResponse {
    fn from(record: HospitalRecord) -> Self {
        Self {
            name: record.name,
            lat: record.location.lat(),
            lon: record.location.lon(),
            distance_km: record.distance_km,
            address: record.address,
            rating: record.rating,
            source: record.source.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<UnresponsiveSource>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            failures: Vec::new(),
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Index handler with service information
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "instance_name": state.instance_name(),
        "version": crate::VERSION,
        "endpoints": ["/discover", "/providers", "/health", "/stats"],
    }))
}

/// Discovery handler: the full geolocate → fetch → merge → rank flow
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Response {
    // Resolve the anchor: explicit coordinates win, otherwise the locator.
    let anchor = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => match Coordinate::new(lat, lon) {
            Ok(coord) => coord,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(e.to_string())),
                )
                    .into_response();
            }
        },
        (None, None) => match state.locator.locate().await {
            Ok(coord) => coord,
            Err(e) => {
                tracing::warn!("Location acquisition failed: {}", e);
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(
                        ErrorResponse::new(
                            "Unable to retrieve location. \
                             Please ensure location services are enabled.",
                        )
                        .with_detail(e.to_string()),
                    ),
                )
                    .into_response();
            }
        },
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("lat and lon must be supplied together")),
            )
                .into_response();
        }
    };

    let request = DiscoveryRequest::new(anchor)
        .with_radius_m(params.radius.unwrap_or(state.settings.discovery.search_radius_m))
        .with_limit(params.limit.unwrap_or(state.settings.discovery.top_k));

    match state.discovery.execute(&request).await {
        Ok(outcome) => Json(discover_response(outcome)).into_response(),
        Err(DiscoveryError::AllSourcesFailed { failures }) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "All hospital sources failed".to_string(),
                detail: None,
                failures,
            }),
        )
            .into_response(),
        Err(e @ DiscoveryError::NoSourcesConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

fn discover_response(outcome: DiscoveryOutcome) -> DiscoverResponse {
    let message = outcome
        .is_empty()
        .then(|| "No hospitals found nearby.".to_string());

    DiscoverResponse {
        anchor: outcome.anchor,
        count: outcome.hospitals.len(),
        total_found: outcome.total_found,
        from_cache: outcome.from_cache,
        hospitals: outcome.hospitals.into_iter().map(Into::into).collect(),
        unresponsive_sources: outcome.unresponsive,
        timings: outcome.timings,
        message,
    }
}

/// Provider list handler
pub async fn providers(State(state): State<AppState>) -> impl IntoResponse {
    let providers: Vec<_> = state
        .registry
        .names()
        .into_iter()
        .map(|name| {
            let enabled = state
                .registry
                .get_config(name)
                .map(|c| !c.disabled)
                .unwrap_or(true);
            serde_json::json!({ "name": name, "enabled": enabled })
        })
        .collect();

    Json(serde_json::json!({ "providers": providers }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

/// Metrics snapshot handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Source;

    #[test]
    fn test_empty_outcome_message() {
        let outcome = DiscoveryOutcome {
            anchor: Coordinate::new(10.0, 10.0).unwrap(),
            hospitals: vec![],
            total_found: 0,
            from_cache: false,
            unresponsive: vec![],
            timings: vec![],
        };

        let response = discover_response(outcome);
        assert_eq!(response.message.as_deref(), Some("No hospitals found nearby."));
        assert_eq!(response.count, 0);
    }

    #[test]
    fn test_hospital_response_mapping() {
        let record = HospitalRecord::new(
            "City Hospital",
            Coordinate::new(12.98, 77.60).unwrap(),
            Source::GooglePlaces,
        )
        .with_address("12 Main St")
        .with_rating(4.1);

        let response = HospitalResponse::from(record);
        assert_eq!(response.name, "City Hospital");
        assert_eq!(response.source, "google_places");
        assert_eq!(response.address.as_deref(), Some("12 Main St"));
        assert!((response.lat - 12.98).abs() < 1e-9);
    }
}
