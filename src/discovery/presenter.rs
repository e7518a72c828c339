//! Map-marker presentation hook
//!
//! The discovery flow pushes marker placements to a collaborator it never
//! reads back from; rendering itself lives outside this crate.

use crate::geo::Coordinate;
use tracing::debug;

/// Side-effecting sink for map markers
pub trait MarkerSink: Send + Sync {
    /// Place one labeled marker
    fn place_marker(&self, location: &Coordinate, label: &str);
}

/// Default sink that logs placements at debug level
pub struct LogMarkerSink;

impl MarkerSink for LogMarkerSink {
    fn place_marker(&self, location: &Coordinate, label: &str) {
        debug!("map marker at {}: {}", location, label);
    }
}
