//! Provider registry for managing available hospital data providers

use super::traits::Provider;
use crate::config::ProviderConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available providers.
///
/// Keeps registration order: the discovery executor fans out in this order
/// and merges settled results in the same order, which is what makes the
/// merged record list deterministic.
pub struct ProviderRegistry {
    /// Providers by name
    providers: HashMap<String, Arc<dyn Provider>>,
    /// Provider configurations
    configs: HashMap<String, ProviderConfig>,
    /// Registration order
    order: Vec<String>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            configs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a provider
    pub fn register(&mut self, provider: Arc<dyn Provider>, config: ProviderConfig) {
        let name = provider.name().to_string();

        if !self.providers.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.providers.insert(name.clone(), provider);
        self.configs.insert(name, config);
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// Get provider config
    pub fn get_config(&self, name: &str) -> Option<&ProviderConfig> {
        self.configs.get(name)
    }

    /// All enabled providers, in registration order
    pub fn enabled(&self) -> Vec<Arc<dyn Provider>> {
        self.order
            .iter()
            .filter(|name| {
                self.configs
                    .get(*name)
                    .map(|c| !c.disabled)
                    .unwrap_or(true)
            })
            .filter_map(|name| self.providers.get(name).cloned())
            .collect()
    }

    /// All provider names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Effective timeout for a provider in seconds: config override first,
    /// then the provider's own default, then the given fallback.
    pub fn get_timeout(&self, name: &str, default: f64) -> f64 {
        self.configs
            .get(name)
            .and_then(|c| c.timeout)
            .or_else(|| self.providers.get(name).map(|p| p.timeout()))
            .unwrap_or(default)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
