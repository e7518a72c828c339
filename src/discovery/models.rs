//! Discovery request and outcome data models

use crate::geo::Coordinate;
use crate::results::{HospitalRecord, Timing, UnresponsiveSource};
use serde::Serialize;
use thiserror::Error;

/// A single hospital discovery request
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryRequest {
    /// User position the search is anchored on
    pub anchor: Coordinate,
    /// Provider search radius in meters
    pub radius_m: u32,
    /// Maximum number of ranked records to return
    pub limit: usize,
}

impl DiscoveryRequest {
    /// Create a request with default radius and limit
    pub fn new(anchor: Coordinate) -> Self {
        Self {
            anchor,
            radius_m: 5000,
            limit: 10,
        }
    }

    pub fn with_radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Errors that abort a discovery round.
///
/// Partial source failure is NOT one of these; the flow proceeds with the
/// remaining sources and reports the failures in the outcome.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Every configured source failed. Distinct from a successful round
    /// that found nothing.
    #[error("all hospital sources failed")]
    AllSourcesFailed { failures: Vec<UnresponsiveSource> },

    /// The registry has no enabled providers.
    #[error("no hospital sources configured")]
    NoSourcesConfigured,
}

/// Result of a discovery round
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryOutcome {
    /// Anchor the round was executed for
    pub anchor: Coordinate,
    /// Ranked records, truncated to the request limit
    pub hospitals: Vec<HospitalRecord>,
    /// Merged record count before truncation
    pub total_found: usize,
    /// Whether the round was answered from the spatial cache
    pub from_cache: bool,
    /// Sources that failed this round
    pub unresponsive: Vec<UnresponsiveSource>,
    /// Per-source fetch timings (empty on cache hits)
    pub timings: Vec<Timing>,
}

impl DiscoveryOutcome {
    /// True when the round succeeded but found nothing nearby.
    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }
}
