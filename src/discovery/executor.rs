//! Discovery execution and orchestration

use super::models::{DiscoveryError, DiscoveryOutcome, DiscoveryRequest};
use super::presenter::{LogMarkerSink, MarkerSink};
use crate::cache::SpatialCache;
use crate::config::DiscoverySettings;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::{FetchParams, Provider, ProviderRegistry};
use crate::results::{rank, HospitalRecord, ResultSet, SourceError, Timing};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Settled result of one provider fetch
struct SourceFetch {
    name: String,
    elapsed_ms: u64,
    outcome: Result<Vec<HospitalRecord>, SourceError>,
}

/// Discovery executor that coordinates fetching across all providers.
///
/// Owns the spatial cache and the partial-failure policy: a failed source
/// is recorded and skipped, and only a round in which every source fails
/// aborts with an error.
pub struct Discovery {
    /// HTTP client for making requests
    client: HttpClient,
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Single-slot cache of the merged record list
    cache: SpatialCache,
    /// Tuning constants
    settings: DiscoverySettings,
    /// Metrics collector
    metrics: Arc<Metrics>,
    /// Presentation hook for map markers
    markers: Arc<dyn MarkerSink>,
}

impl Discovery {
    /// Create a new discovery executor
    pub fn new(
        client: HttpClient,
        registry: Arc<ProviderRegistry>,
        settings: DiscoverySettings,
    ) -> Self {
        let cache = SpatialCache::new(settings.cache_ttl(), settings.cache_radius_km);

        Self {
            client,
            registry,
            cache,
            settings,
            metrics: Arc::new(Metrics::new()),
            markers: Arc::new(LogMarkerSink),
        }
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the marker sink
    pub fn with_marker_sink(mut self, markers: Arc<dyn MarkerSink>) -> Self {
        self.markers = markers;
        self
    }

    /// Access the spatial cache (tests, operational tooling)
    pub fn cache(&self) -> &SpatialCache {
        &self.cache
    }

    /// Execute one discovery round for an anchor.
    pub async fn execute(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        self.metrics.inc_discovery();

        let providers = self.registry.enabled();
        if providers.is_empty() {
            return Err(DiscoveryError::NoSourcesConfigured);
        }

        self.markers.place_marker(&request.anchor, "Your location");

        // Serve from the cache while its age and anchor-distance bounds hold.
        if let Some(payload) = self.cache.get(request.anchor) {
            debug!("Serving {} cached records for {}", payload.len(), request.anchor);
            self.metrics.inc_cache_hit();
            return Ok(self.present(request, payload, true, Vec::new(), Vec::new()));
        }

        info!(
            "Querying {} hospital sources around {} (radius {} m)",
            providers.len(),
            request.anchor,
            request.radius_m
        );

        let futures: Vec<_> = providers
            .iter()
            .map(|provider| self.fetch_source(provider.clone(), request))
            .collect();

        // join_all preserves input order, so merging the settled results in
        // sequence keeps the merged list in provider order regardless of
        // which source answered first.
        let settled = join_all(futures).await;

        let mut set = ResultSet::new();
        for fetch in settled {
            match fetch.outcome {
                Ok(records) => {
                    self.metrics.record_success(&fetch.name);
                    self.metrics.record_response_time(&fetch.name, fetch.elapsed_ms);
                    set.add_timing(Timing {
                        source: fetch.name,
                        time_ms: fetch.elapsed_ms,
                        record_count: records.len(),
                    });
                    set.add_batch(records);
                }
                Err(err) => {
                    self.metrics.record_error(&fetch.name);
                    set.add_unresponsive(fetch.name, err);
                }
            }
        }

        if set.all_failed() {
            return Err(DiscoveryError::AllSourcesFailed {
                failures: set.unresponsive().to_vec(),
            });
        }

        // The cache holds the merged, un-ranked list; a later hit within the
        // radius threshold is re-ranked against its own anchor.
        self.cache.put(request.anchor, set.records().to_vec());

        let unresponsive = set.unresponsive().to_vec();
        let timings = set.timings().to_vec();
        Ok(self.present(request, set.into_records(), false, unresponsive, timings))
    }

    /// Rank, truncate, and package a merged record list.
    fn present(
        &self,
        request: &DiscoveryRequest,
        records: Vec<HospitalRecord>,
        from_cache: bool,
        unresponsive: Vec<crate::results::UnresponsiveSource>,
        timings: Vec<Timing>,
    ) -> DiscoveryOutcome {
        let total_found = records.len();

        let mut hospitals = rank::rank(request.anchor, records);
        hospitals.truncate(request.limit);

        for hospital in &hospitals {
            self.markers.place_marker(&hospital.location, &hospital.name);
        }

        DiscoveryOutcome {
            anchor: request.anchor,
            hospitals,
            total_found,
            from_cache,
            unresponsive,
            timings,
        }
    }

    /// Fetch a single source, converting every failure into a `SourceError`.
    async fn fetch_source(
        &self,
        provider: Arc<dyn Provider>,
        request: &DiscoveryRequest,
    ) -> SourceFetch {
        let name = provider.name().to_string();
        let start = Instant::now();

        self.metrics.record_fetch(&name);

        let fetch_timeout = Duration::from_secs_f64(
            self.registry
                .get_timeout(&name, self.settings.fetch_timeout().as_secs_f64())
                .min(crate::MAX_TIMEOUT as f64),
        );

        debug!("Fetching source {} with timeout {:?}", name, fetch_timeout);

        let params = FetchParams::new(request.anchor, request.radius_m);

        let http_request = match provider.request(&params) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to build request for {}: {}", name, e);
                return SourceFetch {
                    name,
                    elapsed_ms: 0,
                    outcome: Err(SourceError::Unknown),
                };
            }
        };

        let result = timeout(fetch_timeout, self.client.execute(http_request)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(Ok(response)) => {
                if response.is_rate_limited() {
                    warn!("Source {} is rate limited", name);
                    Err(SourceError::RateLimited)
                } else if !response.is_success() {
                    warn!("Source {} returned HTTP {}", name, response.status);
                    Err(SourceError::HttpError(response.status))
                } else {
                    match provider.response(response) {
                        Ok(records) => {
                            debug!(
                                "Source {} returned {} records in {} ms",
                                name,
                                records.len(),
                                elapsed_ms
                            );
                            Ok(records)
                        }
                        Err(e) => {
                            warn!("Failed to parse response from {}: {}", name, e);
                            Err(SourceError::ParseError)
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("Request failed for {}: {}", name, e);
                if e.to_string().contains("timeout") {
                    Err(SourceError::Timeout)
                } else {
                    Err(SourceError::NetworkError)
                }
            }
            Err(_) => {
                warn!("Timeout for source {}", name);
                Err(SourceError::Timeout)
            }
        };

        SourceFetch {
            name,
            elapsed_ms,
            outcome,
        }
    }
}
