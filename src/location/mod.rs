//! Location acquisition capability
//!
//! The discovery flow is anchored on a coordinate the caller may not supply
//! directly. [`Locator`] abstracts acquisition behind an awaitable call with
//! an explicit timeout and error-kind mapping; implementations can be
//! swapped without touching the flow.

use crate::geo::Coordinate;
use crate::network::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Location acquisition failure kinds.
///
/// All of them are fatal to a discovery request; there is no retry.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location request timed out")]
    Timeout,
}

/// An awaitable source of the user's current position
#[async_trait]
pub trait Locator: Send + Sync {
    /// Locator name for logging
    fn name(&self) -> &str;

    /// Acquire the current position
    async fn locate(&self) -> Result<Coordinate, LocationError>;
}

/// Locator for a known, fixed position (manual input, tests)
pub struct FixedLocator {
    position: Coordinate,
}

impl FixedLocator {
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn locate(&self) -> Result<Coordinate, LocationError> {
        Ok(self.position)
    }
}

/// IP-geolocation backed locator.
///
/// Calls a JSON IP geolocation endpoint with a hard timeout; a cached
/// previous position is never reused.
pub struct IpLocator {
    client: HttpClient,
    api_url: String,
    timeout: Duration,
}

impl IpLocator {
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self {
            client,
            api_url: "http://ip-api.com/json".to_string(),
            timeout,
        }
    }

    /// Use an alternate geolocation endpoint (tests).
    pub fn with_endpoint(client: HttpClient, api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Locator for IpLocator {
    fn name(&self) -> &str {
        "ip"
    }

    async fn locate(&self) -> Result<Coordinate, LocationError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(&self.api_url))
            .await
            .map_err(|_| LocationError::Timeout)?
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if response.status == 403 {
            return Err(LocationError::PermissionDenied);
        }
        if !response.is_success() {
            return Err(LocationError::Unavailable(format!(
                "HTTP error: {}",
                response.status
            )));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        // ip-api signals failure inside a 200 body.
        if json.get("status").and_then(|s| s.as_str()) == Some("fail") {
            let message = json
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("geolocation lookup failed");
            return Err(LocationError::Unavailable(message.to_string()));
        }

        let lat = json
            .get("lat")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| LocationError::Unavailable("missing latitude".to_string()))?;
        let lon = json
            .get("lon")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| LocationError::Unavailable("missing longitude".to_string()))?;

        let position = Coordinate::new(lat, lon)
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        debug!("IP geolocation resolved to {}", position);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn locator_for(server: &MockServer, timeout_ms: u64) -> IpLocator {
        IpLocator::with_endpoint(
            HttpClient::new().unwrap(),
            format!("{}/json", server.uri()),
            Duration::from_millis(timeout_ms),
        )
    }

    #[tokio::test]
    async fn test_fixed_locator() {
        let position = Coordinate::new(12.9716, 77.5946).unwrap();
        let locator = FixedLocator::new(position);
        assert_eq!(locator.locate().await.unwrap(), position);
    }

    #[tokio::test]
    async fn test_ip_locator_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"success","lat":59.3293,"lon":18.0686}"#,
            ))
            .mount(&server)
            .await;

        let position = locator_for(&server, 5000).locate().await.unwrap();
        assert!((position.lat() - 59.3293).abs() < 1e-9);
        assert!((position.lon() - 18.0686).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ip_locator_fail_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"fail","message":"private range"}"#,
            ))
            .mount(&server)
            .await;

        let err = locator_for(&server, 5000).locate().await.unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_ip_locator_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = locator_for(&server, 5000).locate().await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_ip_locator_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"success","lat":1.0,"lon":2.0}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = locator_for(&server, 50).locate().await.unwrap_err();
        assert!(matches!(err, LocationError::Timeout));
    }
}
