//! Application state shared across handlers

use crate::config::Settings;
use crate::discovery::Discovery;
use crate::location::{IpLocator, Locator};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::ProviderRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Provider registry
    pub registry: Arc<ProviderRegistry>,
    /// Discovery executor
    pub discovery: Arc<Discovery>,
    /// Location acquisition capability
    pub locator: Arc<dyn Locator>,
    /// Metrics collector
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: ProviderRegistry, client: HttpClient) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(registry);
        let metrics = Arc::new(Metrics::new());
        let locator: Arc<dyn Locator> = Arc::new(IpLocator::new(
            client.clone(),
            settings.discovery.location_timeout(),
        ));
        let discovery = Arc::new(
            Discovery::new(client, registry.clone(), settings.discovery.clone())
                .with_metrics(metrics.clone()),
        );

        Self {
            settings,
            registry,
            discovery,
            locator,
            metrics,
        }
    }

    /// Swap the location capability (tests, alternate deployments)
    pub fn with_locator(mut self, locator: Arc<dyn Locator>) -> Self {
        self.locator = locator;
        self
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
