//! Provider loader for initializing providers from configuration

use super::google_places::GooglePlaces;
use super::overpass::Overpass;
use super::registry::ProviderRegistry;
use super::traits::Provider;
use crate::config::{ProviderConfig, Settings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all providers from settings
    pub fn load(settings: &Settings) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            if let Some(ref endpoint) = config.endpoint {
                Url::parse(endpoint).map_err(|e| {
                    anyhow::anyhow!("invalid endpoint for provider {}: {}", config.name, e)
                })?;
            }

            match Self::create_provider(&config.provider, config) {
                Ok(Some(provider)) => {
                    info!("Loaded provider: {} ({})", config.name, config.provider);
                    registry.register(provider, config.clone());
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    /// Create a provider instance by type name.
    ///
    /// Returns `Ok(None)` for providers that are configured but not usable,
    /// such as Google Places without an API key.
    fn create_provider(
        provider_type: &str,
        config: &ProviderConfig,
    ) -> Result<Option<Arc<dyn Provider>>> {
        let provider: Arc<dyn Provider> = match provider_type {
            "overpass" => match &config.endpoint {
                Some(endpoint) => Arc::new(Overpass::with_endpoint(endpoint.clone())),
                None => Arc::new(Overpass::new()),
            },
            "google_places" => {
                let Some(api_key) = config.api_key.clone().filter(|k| !k.is_empty()) else {
                    warn!(
                        "Skipping provider {}: no API key configured \
                         (set MEDFINDER_GOOGLE_API_KEY)",
                        config.name
                    );
                    return Ok(None);
                };
                match &config.endpoint {
                    Some(endpoint) => {
                        Arc::new(GooglePlaces::with_endpoint(endpoint.clone(), api_key))
                    }
                    None => Arc::new(GooglePlaces::new(api_key)),
                }
            }
            _ => {
                return Err(anyhow::anyhow!("Unknown provider type: {}", provider_type));
            }
        };

        Ok(Some(provider))
    }

    /// Get list of available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["overpass", "google_places"]
    }
}
