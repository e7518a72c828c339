//! Distance ranking of merged hospital records

use super::types::HospitalRecord;
use crate::geo::{distance_km, Coordinate};
use std::cmp::Ordering;

/// Order records by ascending great-circle distance from the anchor.
///
/// Fills each record's `distance_km` field as a side effect. The sort is
/// stable, so records at equal distance keep their merged (insertion) order.
pub fn rank(anchor: Coordinate, mut records: Vec<HospitalRecord>) -> Vec<HospitalRecord> {
    for record in &mut records {
        record.distance_km = Some(distance_km(anchor, record.location));
    }

    records.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });

    records
}
