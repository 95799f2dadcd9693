//! Service registry
//!
//! Static, read-only mapping from a logical service name to its
//! filesystem root and the operations callers may run against it.
//! Built once from `Config` at startup and shared behind an `Arc`.

use crate::core::config::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Operations a service can allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceOp {
    Read,
    List,
    Search,
}

impl ServiceOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOp::Read => "read",
            ServiceOp::List => "list",
            ServiceOp::Search => "search",
        }
    }
}

/// A named service subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    /// Root as configured, joined onto the project root
    pub root_path: PathBuf,
    pub allowed_operations: Vec<ServiceOp>,
}

impl ServiceDescriptor {
    pub fn allows(&self, op: ServiceOp) -> bool {
        self.allowed_operations.contains(&op)
    }
}

/// Immutable registry of services
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    project_root: PathBuf,
    services: BTreeMap<String, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Build the registry from configuration
    pub fn from_config(config: &Config) -> Self {
        let project_root = config.project.root.clone();
        let services = config
            .services
            .iter()
            .map(|(name, service)| {
                let descriptor = ServiceDescriptor {
                    name: name.clone(),
                    root_path: project_root.join(&service.path),
                    allowed_operations: service.operations.clone(),
                };
                (name.clone(), descriptor)
            })
            .collect();

        Self {
            project_root,
            services,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Look up a service by name
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// Look up a service only if it allows `op`
    pub fn get_for(&self, name: &str, op: ServiceOp) -> Option<&ServiceDescriptor> {
        self.get(name).filter(|service| service.allows(op))
    }

    /// Allow-list membership check used by the validators
    pub fn is_allowed(&self, name: &str, op: ServiceOp) -> bool {
        self.get_for(name, op).is_some()
    }

    /// Names of services allowing `op`, sorted
    pub fn names_for(&self, op: ServiceOp) -> Vec<String> {
        self.services
            .values()
            .filter(|service| service.allows(op))
            .map(|service| service.name.clone())
            .collect()
    }

    /// All services, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
