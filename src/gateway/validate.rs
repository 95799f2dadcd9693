//! Per-operation parameter validation.
//!
//! Validation is pure: it looks at the JSON parameters and the
//! registry's allow-list, never at the filesystem. A request that
//! fails here is rejected with INVALID_PARAMS before any path is
//! resolved.

use crate::core::config::LimitsConfig;
use crate::core::error::{GatewayError, Result};
use crate::core::registry::{ServiceOp, ServiceRegistry};
use crate::core::search::normalize_file_types;
use crate::gateway::operation::{
    ListParams, OperationKind, OperationRequest, ReadParams, SearchParams,
};
use serde_json::Value;
use std::sync::Arc;

/// Typed, checked search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSearch {
    pub query: String,
    pub file_types: Vec<String>,
    /// Clamped to the configured cap
    pub max_results: usize,
    pub service: Option<String>,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRequest {
    Read { service: String, file_path: String },
    List { service: String, dir_path: String },
    Search(ValidatedSearch),
    Structure,
}

/// Schema validator for every operation
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: Arc<ServiceRegistry>,
    limits: LimitsConfig,
}

impl SchemaValidator {
    pub fn new(registry: Arc<ServiceRegistry>, limits: LimitsConfig) -> Self {
        Self { registry, limits }
    }

    /// Validate `params` for `kind`
    pub fn validate(&self, kind: OperationKind, params: &Value) -> Result<ValidatedRequest> {
        match OperationRequest::parse(kind, params)? {
            OperationRequest::Read(p) => self.check_read(p),
            OperationRequest::List(p) => self.check_list(p),
            OperationRequest::Search(p) => self.check_search(p),
            OperationRequest::Structure => Ok(ValidatedRequest::Structure),
        }
    }

    pub fn read(&self, params: &Value) -> bool {
        self.validate(OperationKind::Read, params).is_ok()
    }

    pub fn list(&self, params: &Value) -> bool {
        self.validate(OperationKind::List, params).is_ok()
    }

    pub fn search(&self, params: &Value) -> bool {
        self.validate(OperationKind::Search, params).is_ok()
    }

    fn check_service(&self, service: &str, op: ServiceOp) -> Result<()> {
        if self.registry.is_allowed(service, op) {
            Ok(())
        } else {
            Err(GatewayError::InvalidParams(format!(
                "service '{service}' is not available for {}",
                op.as_str()
            )))
        }
    }

    fn check_read(&self, params: ReadParams) -> Result<ValidatedRequest> {
        self.check_service(&params.service, ServiceOp::Read)?;
        if params.file_path.trim().is_empty() {
            return Err(GatewayError::InvalidParams(
                "filePath must not be empty".to_string(),
            ));
        }

        Ok(ValidatedRequest::Read {
            service: params.service,
            file_path: params.file_path,
        })
    }

    fn check_list(&self, params: ListParams) -> Result<ValidatedRequest> {
        self.check_service(&params.service, ServiceOp::List)?;

        let dir_path = match params.dir_path {
            Some(dir) if !dir.trim().is_empty() => dir,
            _ => ".".to_string(),
        };

        Ok(ValidatedRequest::List {
            service: params.service,
            dir_path,
        })
    }

    fn check_search(&self, params: SearchParams) -> Result<ValidatedRequest> {
        if params.query.is_empty() {
            return Err(GatewayError::InvalidParams(
                "query must not be empty".to_string(),
            ));
        }
        if params.query.chars().count() > self.limits.max_query_length {
            return Err(GatewayError::InvalidParams(format!(
                "query exceeds {} characters",
                self.limits.max_query_length
            )));
        }
        if params.query.contains(['\n', '\r']) {
            return Err(GatewayError::InvalidParams(
                "query must be a single line".to_string(),
            ));
        }

        if let Some(service) = &params.service {
            self.check_service(service, ServiceOp::Search)?;
        }

        let max_results = match params.max_results {
            Some(0) => {
                return Err(GatewayError::InvalidParams(
                    "maxResults must be at least 1".to_string(),
                ))
            }
            Some(n) => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.limits.max_results_cap),
            None => self.limits.default_max_results,
        };

        Ok(ValidatedRequest::Search(ValidatedSearch {
            query: params.query,
            file_types: normalize_file_types(params.file_types.unwrap_or_default()),
            max_results,
            service: params.service,
        }))
    }
}
