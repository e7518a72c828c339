//! Metrics collection module
//!
//! Tracks discovery counts, cache effectiveness, and per-source performance
//! and error rates.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Global metrics collector
pub struct Metrics {
    /// Total discovery requests
    total_discoveries: AtomicU64,
    /// Discoveries answered from the spatial cache
    cache_hits: AtomicU64,
    /// Fetches per source
    source_fetches: RwLock<HashMap<String, u64>>,
    /// Source response times (rolling window in ms)
    source_response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Source error counts
    source_errors: RwLock<HashMap<String, u64>>,
    /// Source success counts
    source_successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_discoveries: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            source_fetches: RwLock::new(HashMap::new()),
            source_response_times: RwLock::new(HashMap::new()),
            source_errors: RwLock::new(HashMap::new()),
            source_successes: RwLock::new(HashMap::new()),
        }
    }

    /// Increment discovery count
    pub fn inc_discovery(&self) {
        self.total_discoveries.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment cache hit count
    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a source fetch
    pub fn record_fetch(&self, source: &str) {
        let mut fetches = self.source_fetches.write().unwrap();
        *fetches.entry(source.to_string()).or_insert(0) += 1;
    }

    /// Record source response time
    pub fn record_response_time(&self, source: &str, time_ms: u64) {
        let mut times = self.source_response_times.write().unwrap();
        let entry = times.entry(source.to_string()).or_default();

        // Keep last 100 response times
        if entry.len() >= 100 {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record source error
    pub fn record_error(&self, source: &str) {
        let mut errors = self.source_errors.write().unwrap();
        *errors.entry(source.to_string()).or_insert(0) += 1;
    }

    /// Record source success
    pub fn record_success(&self, source: &str) {
        let mut successes = self.source_successes.write().unwrap();
        *successes.entry(source.to_string()).or_insert(0) += 1;
    }

    /// Get total discoveries
    pub fn total_discoveries(&self) -> u64 {
        self.total_discoveries.load(Ordering::Relaxed)
    }

    /// Get cache hits
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get average response time for a source
    pub fn avg_response_time(&self, source: &str) -> Option<u64> {
        let times = self.source_response_times.read().unwrap();
        times.get(source).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a source
    pub fn reliability(&self, source: &str) -> f64 {
        let errors = self.source_errors.read().unwrap();
        let successes = self.source_successes.read().unwrap();

        let error_count = *errors.get(source).unwrap_or(&0);
        let success_count = *successes.get(source).unwrap_or(&0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Snapshot for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        let fetches = self.source_fetches.read().unwrap();
        let mut sources = HashMap::new();

        for source in fetches.keys() {
            sources.insert(
                source.clone(),
                SourceStats {
                    fetches: *fetches.get(source).unwrap_or(&0),
                    avg_response_time_ms: self.avg_response_time(source),
                    reliability_pct: self.reliability(source),
                },
            );
        }

        MetricsSnapshot {
            total_discoveries: self.total_discoveries(),
            cache_hits: self.cache_hits(),
            sources,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time metrics view
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_discoveries: u64,
    pub cache_hits: u64,
    pub sources: HashMap<String, SourceStats>,
}

/// Statistics for a single source
#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub fetches: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability_pct: f64,
}
