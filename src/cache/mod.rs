//! Caching module for MedFinder-RS
//!
//! A single-slot memoization of the merged hospital list, keyed implicitly by
//! capture time and anchor proximity rather than by an explicit key.

use crate::geo::{distance_km, Coordinate};
use crate::results::HospitalRecord;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// The one cached discovery round.
#[derive(Debug, Clone)]
struct CacheEntry {
    captured_at: Instant,
    anchor: Coordinate,
    payload: Vec<HospitalRecord>,
}

/// Single-slot spatial cache for merged hospital records.
///
/// `get` returns the payload only while the entry's age is within the TTL
/// AND the requested anchor is strictly closer than the radius threshold to
/// the entry's anchor. Both bounds must hold; either one expiring
/// invalidates the entry implicitly. `put` replaces the slot
/// unconditionally.
///
/// The slot is behind an `RwLock`, so concurrent server requests keep
/// atomic replace-the-slot semantics.
pub struct SpatialCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
    radius_km: f64,
}

impl SpatialCache {
    /// Create a cache with the given TTL and anchor radius threshold.
    pub fn new(ttl: Duration, radius_km: f64) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            radius_km,
        }
    }

    /// Get the cached payload for an anchor, if still valid now.
    pub fn get(&self, anchor: Coordinate) -> Option<Vec<HospitalRecord>> {
        self.get_at(anchor, Instant::now())
    }

    /// Get the cached payload as of an explicit instant.
    pub fn get_at(&self, anchor: Coordinate, now: Instant) -> Option<Vec<HospitalRecord>> {
        let slot = self.slot.read().unwrap();
        let entry = slot.as_ref()?;

        if now.duration_since(entry.captured_at) > self.ttl {
            return None;
        }
        if distance_km(anchor, entry.anchor) >= self.radius_km {
            return None;
        }

        Some(entry.payload.clone())
    }

    /// Store a payload, discarding any previous entry.
    pub fn put(&self, anchor: Coordinate, payload: Vec<HospitalRecord>) {
        self.put_at(anchor, payload, Instant::now());
    }

    /// Store a payload with an explicit capture instant.
    pub fn put_at(&self, anchor: Coordinate, payload: Vec<HospitalRecord>, now: Instant) {
        let mut slot = self.slot.write().unwrap();
        *slot = Some(CacheEntry {
            captured_at: now,
            anchor,
            payload,
        });
    }

    /// Drop the cached entry, if any.
    pub fn clear(&self) {
        *self.slot.write().unwrap() = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

impl Default for SpatialCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_800_000), 2.0) // 30 minutes, 2 km
    }
}
