//! Operation table
//!
//! The set of operations is closed: each one is a variant of
//! [`OperationKind`] with a typed parameter struct, and every variant
//! is listed exactly once in [`OPERATIONS`]. Adapters look operations
//! up by their canonical name or by the MCP tool name.

use crate::core::error::{GatewayError, Result};
use crate::core::registry::{ServiceOp, ServiceRegistry};
use serde::Deserialize;
use serde_json::{json, Value};

/// Every operation the gateway exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Read,
    List,
    Search,
    Structure,
}

/// Static description of one operation
#[derive(Debug)]
pub struct OperationSpec {
    pub kind: OperationKind,
    /// Canonical name
    pub name: &'static str,
    /// Name exposed as an MCP tool
    pub tool_name: &'static str,
    pub description: &'static str,
    /// Service permission the operation needs, if it takes a service
    pub service_op: Option<ServiceOp>,
}

/// Startup table of operations
pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        kind: OperationKind::Read,
        name: "read",
        tool_name: "read_multi_service_file",
        description: "Read a text file from a service directory. Output is bounded \
                      by the per-file byte cap and secrets are redacted.",
        service_op: Some(ServiceOp::Read),
    },
    OperationSpec {
        kind: OperationKind::List,
        name: "list",
        tool_name: "list_service_files",
        description: "List files and directories in a service directory. Hidden and \
                      blocked entries are omitted.",
        service_op: Some(ServiceOp::List),
    },
    OperationSpec {
        kind: OperationKind::Search,
        name: "search",
        tool_name: "search_across_services",
        description: "Search for a literal, case-sensitive string across all services \
                      or within one service. Results are capped and snippets redacted.",
        service_op: Some(ServiceOp::Search),
    },
    OperationSpec {
        kind: OperationKind::Structure,
        name: "structure",
        tool_name: "get_project_structure",
        description: "Get an overview of the configured services and their roots.",
        service_op: None,
    },
];

impl OperationKind {
    /// Look up by canonical or tool name
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|spec| spec.name == name || spec.tool_name == name)
            .map(|spec| spec.kind)
    }

    pub fn spec(&self) -> &'static OperationSpec {
        // Every variant has a row; the fallback is unreachable.
        OPERATIONS
            .iter()
            .find(|spec| spec.kind == *self)
            .unwrap_or(&OPERATIONS[0])
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn tool_name(&self) -> &'static str {
        self.spec().tool_name
    }

    /// JSON Schema for the parameters, with the service enum taken
    /// from the registry's allow-list for this operation
    pub fn input_schema(&self, registry: &ServiceRegistry) -> Value {
        let services = |op: ServiceOp| Value::from(registry.names_for(op));

        match self {
            OperationKind::Read => json!({
                "type": "object",
                "properties": {
                    "service": {
                        "type": "string",
                        "enum": services(ServiceOp::Read),
                        "description": "Service directory to read from"
                    },
                    "filePath": {
                        "type": "string",
                        "description": "Relative path within the service directory"
                    }
                },
                "required": ["service", "filePath"]
            }),
            OperationKind::List => json!({
                "type": "object",
                "properties": {
                    "service": {
                        "type": "string",
                        "enum": services(ServiceOp::List)
                    },
                    "dirPath": {
                        "type": "string",
                        "description": "Directory path within the service (optional)",
                        "default": "."
                    }
                },
                "required": ["service"]
            }),
            OperationKind::Search => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Literal text to search for (case-sensitive)"
                    },
                    "fileTypes": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "File extensions to include (e.g., [\".js\", \".php\", \".py\"])"
                    },
                    "maxResults": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum matches to return"
                    },
                    "service": {
                        "type": "string",
                        "enum": services(ServiceOp::Search),
                        "description": "Restrict the search to one service (optional)"
                    }
                },
                "required": ["query"]
            }),
            OperationKind::Structure => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadParams {
    pub service: String,
    #[serde(rename = "filePath", alias = "file_path")]
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub service: String,
    #[serde(rename = "dirPath", alias = "dir_path", alias = "directory", default)]
    pub dir_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(rename = "fileTypes", alias = "file_types", default)]
    pub file_types: Option<Vec<String>>,
    #[serde(rename = "maxResults", alias = "max_results", default)]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub service: Option<String>,
}

/// A parsed request with typed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Read(ReadParams),
    List(ListParams),
    Search(SearchParams),
    Structure,
}

impl OperationRequest {
    /// Parse `params` into the typed parameters of `kind`.
    ///
    /// Checks shape only (required keys and primitive types); the
    /// semantic checks live in `gateway::validate`. A missing or null
    /// `params` is treated as an empty object.
    pub fn parse(kind: OperationKind, params: &Value) -> Result<Self> {
        let params = match params {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => params.clone(),
            _ => {
                return Err(GatewayError::InvalidParams(
                    "params must be an object".to_string(),
                ))
            }
        };

        let request = match kind {
            OperationKind::Read => OperationRequest::Read(from_params(params)?),
            OperationKind::List => OperationRequest::List(from_params(params)?),
            OperationKind::Search => OperationRequest::Search(from_params(params)?),
            OperationKind::Structure => OperationRequest::Structure,
        };
        Ok(request)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Read(_) => OperationKind::Read,
            OperationRequest::List(_) => OperationKind::List,
            OperationRequest::Search(_) => OperationKind::Search,
            OperationRequest::Structure => OperationKind::Structure,
        }
    }
}

fn from_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| GatewayError::InvalidParams(e.to_string()))
}
