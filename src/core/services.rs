//! Unified service container for fsgate
//!
//! Provides shared access to all core services. Everything here is
//! built once at startup and immutable afterwards, so cloning is cheap
//! and no locks are needed.

use crate::core::config::Config;
use crate::core::policy::PathPolicy;
use crate::core::registry::ServiceRegistry;
use crate::core::resolver::PathResolver;
use crate::core::search::SearchEngine;
use std::sync::Arc;
use std::time::Duration;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Debug, Clone)]
pub struct Services {
    /// Service name to root mapping
    pub registry: Arc<ServiceRegistry>,

    /// Path resolver with the configured policy
    pub resolver: Arc<PathResolver>,

    /// Bounded content search
    pub search: Arc<SearchEngine>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let policy = PathPolicy::from_config(&config.policy);
        let registry = Arc::new(ServiceRegistry::from_config(&config));
        let resolver = Arc::new(PathResolver::new(policy.clone()));

        let search = Arc::new(SearchEngine::new(
            policy,
            config.limits.snippet_max_chars,
            Duration::from_millis(config.limits.search_timeout_ms),
        ));

        Self {
            registry,
            resolver,
            search,
            config: Arc::new(config),
        }
    }
}
