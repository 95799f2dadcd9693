//! Configuration management for the fsgate file gateway.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The result is a plain settings value handed to the core once at
//! startup; nothing here is consulted per request except through
//! the immutable `Services` container.

use crate::core::error::{GatewayError, Result};
use crate::core::registry::ServiceOp;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default = "default_services")]
    pub services: BTreeMap<String, ServiceConfig>,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Project configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project root; service paths are resolved against it
    #[serde(default = "default_project_root")]
    pub root: PathBuf,
}

/// One named service subtree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Root of the service, relative to the project root (or absolute)
    pub path: PathBuf,

    /// Operations callers may run against this service
    #[serde(default = "default_operations")]
    pub operations: Vec<ServiceOp>,
}

/// Path policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Allow path segments starting with '.'
    #[serde(default)]
    pub allow_dotfiles: bool,

    /// Extensions that are never served (with leading '.')
    #[serde(default = "default_blocked_extensions")]
    pub blocked_extensions: Vec<String>,

    /// Case-insensitive substrings that block any path containing them
    #[serde(default = "default_blocked_substrings")]
    pub blocked_substrings: Vec<String>,
}

/// Resource limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Byte cap for reads and for files scanned by search
    #[serde(default = "default_max_bytes_per_file")]
    pub max_bytes_per_file: u64,

    /// Search results returned when the caller does not ask
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Hard cap on search results, even if the caller asks for more
    #[serde(default = "default_max_results_cap")]
    pub max_results_cap: usize,

    /// Maximum entries returned by a directory listing
    #[serde(default = "default_max_list_entries")]
    pub max_list_entries: usize,

    /// Maximum search query length in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Maximum characters kept per search snippet
    #[serde(default = "default_snippet_max_chars")]
    pub snippet_max_chars: usize,

    /// Traversal time budget for one search, in milliseconds
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
}

/// Rate limiting for the MCP adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests allowed per interval
    #[serde(default = "default_rate_requests")]
    pub requests: u32,

    /// Refill interval in milliseconds
    #[serde(default = "default_rate_interval_ms")]
    pub interval_ms: u64,
}

// Default value functions
fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_operations() -> Vec<ServiceOp> {
    vec![ServiceOp::Read, ServiceOp::List, ServiceOp::Search]
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    [
        ("api", "api.menschlichkeit-oesterreich.at"),
        ("crm", "crm.menschlichkeit-oesterreich.at"),
        ("frontend", "frontend"),
        ("games", "web"),
        ("website", "website"),
        ("n8n", "automation/n8n"),
        ("root", "."),
    ]
    .into_iter()
    .map(|(name, path)| {
        (
            name.to_string(),
            ServiceConfig {
                path: PathBuf::from(path),
                operations: default_operations(),
            },
        )
    })
    .collect()
}

fn default_blocked_extensions() -> Vec<String> {
    vec![
        ".pem".to_string(),
        ".key".to_string(),
        ".p12".to_string(),
        ".pfx".to_string(),
        ".jks".to_string(),
        ".keystore".to_string(),
    ]
}

fn default_blocked_substrings() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "id_rsa".to_string(),
        "id_ed25519".to_string(),
    ]
}

fn default_max_bytes_per_file() -> u64 {
    262_144 // 256 KiB
}

fn default_max_results() -> usize {
    50
}

fn default_max_results_cap() -> usize {
    500
}

fn default_max_list_entries() -> usize {
    500
}

fn default_max_query_length() -> usize {
    500
}

fn default_snippet_max_chars() -> usize {
    240
}

fn default_search_timeout_ms() -> u64 {
    5_000
}

fn default_rate_requests() -> u32 {
    30
}

fn default_rate_interval_ms() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            services: default_services(),
            policy: PolicyConfig::default(),
            limits: LimitsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_project_root(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_dotfiles: false,
            blocked_extensions: default_blocked_extensions(),
            blocked_substrings: default_blocked_substrings(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_bytes_per_file: default_max_bytes_per_file(),
            default_max_results: default_max_results(),
            max_results_cap: default_max_results_cap(),
            max_list_entries: default_max_list_entries(),
            max_query_length: default_max_query_length(),
            snippet_max_chars: default_snippet_max_chars(),
            search_timeout_ms: default_search_timeout_ms(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: default_rate_requests(),
            interval_ms: default_rate_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GatewayError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Config rooted at `root` with the default service map
    pub fn with_project_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project: ProjectConfig { root: root.into() },
            ..Self::default()
        }
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File lookup order:
    /// 1. FSGATE_CONFIG env var
    /// 2. XDG config file (~/.config/fsgate/config.toml)
    /// 3. ./fsgate.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("FSGATE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("fsgate.toml").exists() {
                Self::from_file("fsgate.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unprefixed legacy names are also read; the FSGATE_ names win
    /// when both are set.
    pub fn merge_env(&mut self) {
        if let Some(root) = first_env(&["FSGATE_PROJECT_ROOT", "PROJECT_ROOT"]) {
            self.project.root = PathBuf::from(root);
        }

        if let Some(v) = first_env(&["FSGATE_ALLOW_DOTFILES"]) {
            self.policy.allow_dotfiles = matches!(v.as_str(), "1" | "true" | "yes");
        }

        if let Some(v) = first_env(&["FSGATE_MAX_FILE_BYTES", "MCP_FS_MAX_FILE_BYTES"]) {
            if let Ok(bytes) = v.parse() {
                self.limits.max_bytes_per_file = bytes;
            }
        }
        if let Some(v) = first_env(&["FSGATE_DEFAULT_MAX_RESULTS"]) {
            if let Ok(n) = v.parse() {
                self.limits.default_max_results = n;
            }
        }
        if let Some(v) = first_env(&["FSGATE_SEARCH_TIMEOUT_MS"]) {
            if let Ok(ms) = v.parse() {
                self.limits.search_timeout_ms = ms;
            }
        }

        if let Some(v) = first_env(&["FSGATE_RATE_LIMIT", "MCP_RATE_LIMIT"]) {
            if let Ok(n) = v.parse() {
                self.rate_limit.requests = n;
            }
        }
        if let Some(v) = first_env(&["FSGATE_RATE_INTERVAL_MS", "MCP_RATE_INTERVAL_MS"]) {
            if let Ok(ms) = v.parse() {
                self.rate_limit.interval_ms = ms;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.services.is_empty() {
            return Err(GatewayError::ConfigError(
                "At least one service must be configured".to_string(),
            ));
        }

        for (name, service) in &self.services {
            let valid_name = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid_name {
                return Err(GatewayError::ConfigError(format!(
                    "Invalid service name '{name}'"
                )));
            }
            if service.operations.is_empty() {
                return Err(GatewayError::ConfigError(format!(
                    "Service '{name}' allows no operations"
                )));
            }
        }

        for ext in &self.policy.blocked_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(GatewayError::ConfigError(format!(
                    "Blocked extension '{ext}' must start with '.'"
                )));
            }
        }

        if self.policy.blocked_substrings.iter().any(|s| s.is_empty()) {
            return Err(GatewayError::ConfigError(
                "Blocked substrings must be non-empty".to_string(),
            ));
        }

        if self.limits.max_bytes_per_file == 0 {
            return Err(GatewayError::ConfigError(
                "Max bytes per file must be non-zero".to_string(),
            ));
        }

        if self.limits.default_max_results == 0 {
            return Err(GatewayError::ConfigError(
                "Default max results must be non-zero".to_string(),
            ));
        }

        if self.limits.default_max_results > self.limits.max_results_cap {
            return Err(GatewayError::ConfigError(
                "Default max results cannot exceed the results cap".to_string(),
            ));
        }

        if self.limits.max_list_entries == 0
            || self.limits.max_query_length == 0
            || self.limits.snippet_max_chars == 0
        {
            return Err(GatewayError::ConfigError(
                "List, query and snippet limits must be non-zero".to_string(),
            ));
        }

        if self.limits.search_timeout_ms == 0 {
            return Err(GatewayError::ConfigError(
                "Search timeout must be non-zero".to_string(),
            ));
        }

        if self.rate_limit.requests == 0 || self.rate_limit.interval_ms == 0 {
            return Err(GatewayError::ConfigError(
                "Rate limit requests and interval must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Project root: {:?}", self.project.root);
        for (name, service) in &self.services {
            tracing::info!(
                "  Service '{}': {:?} ({:?})",
                name,
                service.path,
                service.operations
            );
        }
        tracing::info!("  Allow dotfiles: {}", self.policy.allow_dotfiles);
        tracing::info!(
            "  Blocked extensions: {} entries",
            self.policy.blocked_extensions.len()
        );
        tracing::info!(
            "  Blocked substrings: {} entries",
            self.policy.blocked_substrings.len()
        );
        tracing::info!(
            "  Max bytes per file: {}",
            self.limits.max_bytes_per_file
        );
        tracing::info!(
            "  Max results: {} (cap {})",
            self.limits.default_max_results,
            self.limits.max_results_cap
        );
        tracing::info!("  Search timeout: {}ms", self.limits.search_timeout_ms);
        tracing::info!(
            "  Rate limit: {} per {}ms",
            self.rate_limit.requests,
            self.rate_limit.interval_ms
        );
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}
