//! Settings structures for MedFinder-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub discovery: DiscoverySettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            discovery: DiscoverySettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MEDFINDER_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("MEDFINDER_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("MEDFINDER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MEDFINDER_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("MEDFINDER_CACHE_TTL_MS") {
            if let Ok(ttl) = val.parse() {
                self.discovery.cache_ttl_ms = ttl;
            }
        }
        if let Ok(val) = std::env::var("MEDFINDER_SEARCH_RADIUS_M") {
            if let Ok(radius) = val.parse() {
                self.discovery.search_radius_m = radius;
            }
        }
        if let Ok(val) = std::env::var("MEDFINDER_TOP_K") {
            if let Ok(top_k) = val.parse() {
                self.discovery.top_k = top_k;
            }
        }
        if let Ok(val) = std::env::var("MEDFINDER_GOOGLE_API_KEY") {
            for provider in &mut self.providers {
                if provider.provider == "google_places" {
                    provider.api_key = Some(val.clone());
                }
            }
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name displayed in responses
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "MedFinder".to_string(),
        }
    }
}

/// Discovery flow tuning constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Spatial cache time-to-live in milliseconds
    pub cache_ttl_ms: u64,
    /// Spatial cache anchor radius threshold in kilometers
    pub cache_radius_km: f64,
    /// Provider search radius in meters
    pub search_radius_m: u32,
    /// Maximum number of ranked records returned
    pub top_k: usize,
    /// Per-provider fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Location acquisition timeout in milliseconds
    pub location_timeout_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 1_800_000, // 30 minutes
            cache_radius_km: 2.0,
            search_radius_m: 5000,
            top_k: 10,
            fetch_timeout_ms: 10_000,
            location_timeout_ms: 10_000,
        }
    }
}

impl DiscoverySettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Base URL for the instance
    pub base_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8090,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider type to instantiate
    pub provider: String,
    /// Whether provider is disabled
    pub disabled: bool,
    /// Custom timeout for this provider in seconds
    pub timeout: Option<f64>,
    /// API key if required
    pub api_key: Option<String>,
    /// Endpoint override (mirrors, tests)
    pub endpoint: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            disabled: false,
            timeout: None,
            api_key: None,
            endpoint: None,
        }
    }
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "overpass".to_string(),
            provider: "overpass".to_string(),
            ..Default::default()
        },
        ProviderConfig {
            name: "google_places".to_string(),
            provider: "google_places".to_string(),
            ..Default::default()
        },
    ]
}
