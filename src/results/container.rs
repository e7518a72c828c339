//! Result set for aggregating hospital records from multiple providers

use super::types::{HospitalRecord, SourceError, Timing, UnresponsiveSource};

/// Aggregates per-provider batches into one merged record list.
///
/// Batches are appended in the order they are added, so with the executor
/// feeding it settled results in provider order the merged list is
/// deterministic. Records from different sources describing the same
/// physical hospital are kept as distinct entries; there is no cross-source
/// dedup.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Vec<HospitalRecord>,
    unresponsive: Vec<UnresponsiveSource>,
    timings: Vec<Timing>,
    sources_ok: usize,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one provider's normalized records.
    pub fn add_batch(&mut self, records: Vec<HospitalRecord>) {
        self.sources_ok += 1;
        self.records.extend(records);
    }

    /// Record a provider that failed this round.
    pub fn add_unresponsive(&mut self, name: impl Into<String>, error: SourceError) {
        self.unresponsive.push(UnresponsiveSource {
            name: name.into(),
            error,
        });
    }

    /// Record provider timing.
    pub fn add_timing(&mut self, timing: Timing) {
        self.timings.push(timing);
    }

    pub fn records(&self) -> &[HospitalRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<HospitalRecord> {
        self.records
    }

    pub fn unresponsive(&self) -> &[UnresponsiveSource] {
        &self.unresponsive
    }

    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of providers that returned a usable (possibly empty) batch.
    pub fn successful_sources(&self) -> usize {
        self.sources_ok
    }

    /// True when every provider in the round failed.
    ///
    /// An empty set with at least one successful source is not a failure,
    /// it is the "no hospitals found nearby" terminal state.
    pub fn all_failed(&self) -> bool {
        self.sources_ok == 0 && !self.unresponsive.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::results::Source;

    fn record(name: &str, lat: f64, source: Source) -> HospitalRecord {
        HospitalRecord::new(name, Coordinate::new(lat, 77.0).unwrap(), source)
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = ResultSet::new();
        set.add_batch(vec![
            record("osm-1", 12.98, Source::OpenStreetMap),
            record("osm-2", 12.99, Source::OpenStreetMap),
        ]);
        set.add_batch(vec![record("google-1", 12.97, Source::GooglePlaces)]);

        let names: Vec<_> = set.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["osm-1", "osm-2", "google-1"]);
    }

    #[test]
    fn test_no_cross_source_dedup() {
        let mut set = ResultSet::new();
        set.add_batch(vec![record("General Hospital", 12.98, Source::OpenStreetMap)]);
        set.add_batch(vec![record("General Hospital", 12.98, Source::GooglePlaces)]);

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_all_failed() {
        let mut set = ResultSet::new();
        set.add_unresponsive("overpass", SourceError::Timeout);
        set.add_unresponsive("google_places", SourceError::HttpError(500));
        assert!(set.all_failed());

        let mut set = ResultSet::new();
        set.add_unresponsive("overpass", SourceError::Timeout);
        set.add_batch(vec![]);
        assert!(!set.all_failed());
        assert!(set.is_empty());
        assert_eq!(set.successful_sources(), 1);
    }
}
