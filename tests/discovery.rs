//! End-to-end discovery flow tests against mocked providers

use medfinder_rs::config::{DiscoverySettings, ProviderConfig};
use medfinder_rs::discovery::{Discovery, DiscoveryError, DiscoveryRequest};
use medfinder_rs::geo::Coordinate;
use medfinder_rs::network::HttpClient;
use medfinder_rs::providers::google_places::GooglePlaces;
use medfinder_rs::providers::overpass::Overpass;
use medfinder_rs::providers::ProviderRegistry;
use medfinder_rs::results::SourceError;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bangalore city center
fn anchor() -> Coordinate {
    Coordinate::new(12.9716, 77.5946).unwrap()
}

/// Overpass payload: one hospital ~1.1 km north, one ~5.6 km north.
fn overpass_body() -> &'static str {
    r#"{
        "elements": [
            {"type": "node", "lat": 12.9816, "lon": 77.5946,
             "tags": {"name": "Near Hospital", "amenity": "hospital"}},
            {"type": "way", "center": {"lat": 13.0216, "lon": 77.5946},
             "tags": {"name": "Far Hospital", "amenity": "hospital"}}
        ]
    }"#
}

/// Google payload: one hospital ~2.2 km north.
fn google_body() -> &'static str {
    r#"{
        "status": "OK",
        "results": [
            {"name": "Mid Hospital",
             "geometry": {"location": {"lat": 12.9916, "lng": 77.5946}},
             "vicinity": "Residency Road",
             "rating": 4.2}
        ]
    }"#
}

fn build_discovery(server: &MockServer) -> Discovery {
    let mut registry = ProviderRegistry::new();
    registry.register(
        Arc::new(Overpass::with_endpoint(format!(
            "{}/api/interpreter",
            server.uri()
        ))),
        ProviderConfig {
            name: "overpass".to_string(),
            provider: "overpass".to_string(),
            ..Default::default()
        },
    );
    registry.register(
        Arc::new(GooglePlaces::with_endpoint(
            format!("{}/places", server.uri()),
            "test-key",
        )),
        ProviderConfig {
            name: "google_places".to_string(),
            provider: "google_places".to_string(),
            ..Default::default()
        },
    );

    Discovery::new(
        HttpClient::new().unwrap(),
        Arc::new(registry),
        DiscoverySettings::default(),
    )
}

async fn mount_overpass(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_google(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_ranked_by_distance() {
    let server = MockServer::start().await;
    mount_overpass(&server, ResponseTemplate::new(200).set_body_string(overpass_body())).await;
    mount_google(&server, ResponseTemplate::new(200).set_body_string(google_body())).await;

    let discovery = build_discovery(&server);
    let outcome = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();

    assert!(!outcome.from_cache);
    assert_eq!(outcome.total_found, 3);

    // Sources interleave by real distance, not by provider.
    let names: Vec<_> = outcome.hospitals.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Near Hospital", "Mid Hospital", "Far Hospital"]);

    let distances: Vec<f64> = outcome
        .hospitals
        .iter()
        .map(|h| h.distance_km.unwrap())
        .collect();
    for pair in distances.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert!(distances[0] > 1.0 && distances[0] < 1.3);
    assert!(distances[1] > 2.0 && distances[1] < 2.4);

    // The Google record keeps its address and rating through the merge.
    let mid = &outcome.hospitals[1];
    assert_eq!(mid.address.as_deref(), Some("Residency Road"));
    assert_eq!(mid.rating, Some(4.2));

    assert_eq!(outcome.timings.len(), 2);
    assert!(outcome.unresponsive.is_empty());
}

#[tokio::test]
async fn test_truncation_to_limit() {
    let server = MockServer::start().await;
    mount_overpass(&server, ResponseTemplate::new(200).set_body_string(overpass_body())).await;
    mount_google(&server, ResponseTemplate::new(200).set_body_string(google_body())).await;

    let discovery = build_discovery(&server);
    let outcome = discovery
        .execute(&DiscoveryRequest::new(anchor()).with_limit(2))
        .await
        .unwrap();

    assert_eq!(outcome.hospitals.len(), 2);
    assert_eq!(outcome.total_found, 3);
    assert_eq!(outcome.hospitals[0].name, "Near Hospital");
    assert_eq!(outcome.hospitals[1].name, "Mid Hospital");
}

#[tokio::test]
async fn test_partial_failure_keeps_surviving_source() {
    let server = MockServer::start().await;
    mount_overpass(&server, ResponseTemplate::new(200).set_body_string(overpass_body())).await;
    mount_google(&server, ResponseTemplate::new(500)).await;

    let discovery = build_discovery(&server);
    let outcome = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();

    assert_eq!(outcome.total_found, 2);
    assert!(outcome
        .hospitals
        .iter()
        .all(|h| h.source.as_str() == "openstreetmap"));

    assert_eq!(outcome.unresponsive.len(), 1);
    assert_eq!(outcome.unresponsive[0].name, "google_places");
    assert_eq!(outcome.unresponsive[0].error, SourceError::HttpError(500));
}

#[tokio::test]
async fn test_rate_limited_source_is_reported() {
    let server = MockServer::start().await;
    mount_overpass(&server, ResponseTemplate::new(200).set_body_string(overpass_body())).await;
    mount_google(&server, ResponseTemplate::new(429)).await;

    let discovery = build_discovery(&server);
    let outcome = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();

    assert_eq!(outcome.unresponsive.len(), 1);
    assert_eq!(outcome.unresponsive[0].error, SourceError::RateLimited);
}

#[tokio::test]
async fn test_all_sources_failed() {
    let server = MockServer::start().await;
    mount_overpass(&server, ResponseTemplate::new(502)).await;
    mount_google(&server, ResponseTemplate::new(500)).await;

    let discovery = build_discovery(&server);
    let result = discovery.execute(&DiscoveryRequest::new(anchor())).await;

    let Err(DiscoveryError::AllSourcesFailed { failures }) = result else {
        panic!("expected AllSourcesFailed");
    };
    assert_eq!(failures.len(), 2);
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let server = MockServer::start().await;
    mount_overpass(
        &server,
        ResponseTemplate::new(200).set_body_string(r#"{"elements": []}"#),
    )
    .await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_string(r#"{"status": "ZERO_RESULTS", "results": []}"#),
    )
    .await;

    let discovery = build_discovery(&server);
    let outcome = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();

    assert!(outcome.is_empty());
    assert!(outcome.hospitals.is_empty());
    assert!(outcome.unresponsive.is_empty());
}

#[tokio::test]
async fn test_second_request_served_from_cache() {
    let server = MockServer::start().await;

    // Each provider must be hit exactly once; the repeat round is a cache hit.
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_string(overpass_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_string(google_body()))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = build_discovery(&server);

    let first = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();
    assert!(!first.from_cache);

    // Same anchor, well within TTL: no provider traffic.
    let second = discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(second.total_found, first.total_found);

    let first_names: Vec<_> = first.hospitals.iter().map(|h| &h.name).collect();
    let second_names: Vec<_> = second.hospitals.iter().map(|h| &h.name).collect();
    assert_eq!(first_names, second_names);
}

#[tokio::test]
async fn test_moved_anchor_bypasses_cache() {
    let server = MockServer::start().await;

    // Two rounds reach the providers when the anchor moves beyond 2 km.
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_string(overpass_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_string(google_body()))
        .expect(2)
        .mount(&server)
        .await;

    let discovery = build_discovery(&server);

    discovery
        .execute(&DiscoveryRequest::new(anchor()))
        .await
        .unwrap();

    // ~3.3 km east of the first anchor.
    let moved = Coordinate::new(12.9716, 77.6246).unwrap();
    let outcome = discovery
        .execute(&DiscoveryRequest::new(moved))
        .await
        .unwrap();
    assert!(!outcome.from_cache);
}
