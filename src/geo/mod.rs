//! Geographic primitives
//!
//! Defines the validated [`Coordinate`] pair and the great-circle distance
//! function used by the cache, the ranker, and the presentation layer.

use serde::Serialize;
use thiserror::Error;

/// Mean Earth radius in kilometers, as used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors from coordinate construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside the valid range -90..90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside the valid range -180..180")]
    LongitudeOutOfRange(f64),
}

/// A validated (latitude, longitude) pair in degrees.
///
/// Immutable once constructed; [`Coordinate::new`] is the only way to obtain
/// one, so every `Coordinate` in the system is within geographic range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) || !lat.is_finite() {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) || !lon.is_finite() {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// Great-circle distance between two coordinates in kilometers (Haversine).
///
/// Symmetric, and zero (within float tolerance) when both points coincide.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
