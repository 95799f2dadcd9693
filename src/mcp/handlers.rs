//! MCP protocol method handlers

use crate::core::search::CancelFlag;
use crate::core::services::Services;
use crate::gateway::{OperationResponse, RequestDispatcher, OPERATIONS};
use crate::mcp::error::McpError;
use crate::mcp::protocol::*;
use crate::mcp::rate_limit::TokenBucket;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "fsgate-mcp";

pub struct ProtocolHandlers {
    initialized: AtomicBool,
    dispatcher: RequestDispatcher,
    rate_limiter: TokenBucket,
    /// Cancel flags of running tool calls, keyed by serialized request id
    in_flight: Mutex<HashMap<String, CancelFlag>>,
}

/// Registration of a running tool call; removed from the table on drop
struct InFlightCall<'a> {
    handlers: &'a ProtocolHandlers,
    key: Option<String>,
    flag: CancelFlag,
}

impl Drop for InFlightCall<'_> {
    fn drop(&mut self) {
        if let Some(key) = &self.key {
            if let Ok(mut in_flight) = self.handlers.in_flight.lock() {
                in_flight.remove(key);
            }
        }
    }
}

impl ProtocolHandlers {
    pub fn new(services: Services) -> Self {
        let rate_limit = &services.config.rate_limit;
        let rate_limiter = TokenBucket::new(
            rate_limit.requests,
            Duration::from_millis(rate_limit.interval_ms),
        );

        Self {
            initialized: AtomicBool::new(false),
            dispatcher: RequestDispatcher::new(services),
            rate_limiter,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    fn track_call(&self, id: Option<&Value>) -> InFlightCall<'_> {
        let flag = CancelFlag::new();
        let key = id.map(Value::to_string);
        if let Some(key) = &key {
            if let Ok(mut in_flight) = self.in_flight.lock() {
                in_flight.insert(key.clone(), flag.clone());
            }
        }
        InFlightCall {
            handlers: self,
            key,
            flag,
        }
    }

    /// Number of tool calls currently running
    pub fn in_flight_calls(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Handle initialize request
    pub async fn handle_initialize(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let params: InitializeParams = match request.params {
            Some(Value::Null) | None => InitializeParams::default(),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| McpError::InvalidParams(e.to_string()))?,
        };

        info!(
            "Client initialized: {} (protocol {})",
            params
                .client_info
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("unknown"),
            params.protocol_version.as_deref().unwrap_or("unspecified")
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    /// Handle initialized notification
    pub async fn handle_initialized(
        &self,
        _request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        self.initialized.store(true, Ordering::SeqCst);
        info!("Server initialized");

        // Initialized is a notification, no response needed
        Ok(JsonRpcResponse::none())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle tools/list request
    pub async fn handle_tools_list(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let registry = &self.dispatcher.services().registry;
        let tools: Vec<ToolSchema> = OPERATIONS
            .iter()
            .map(|spec| ToolSchema {
                name: spec.tool_name.to_string(),
                description: spec.description.to_string(),
                input_schema: spec.kind.input_schema(registry),
            })
            .collect();

        Ok(JsonRpcResponse::success(
            request.id,
            json!({ "tools": tools }),
        ))
    }

    /// Handle tools/call request
    pub async fn handle_tools_call(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let Some(params_value) = request.params else {
            return Ok(JsonRpcResponse::error(
                request.id,
                INVALID_PARAMS,
                "Missing params",
            ));
        };

        let params: ToolCallParams = match serde_json::from_value(params_value) {
            Ok(p) => p,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        if !self.rate_limiter.try_acquire() {
            warn!("Rate limit exceeded for tool '{}'", params.name);
            let result = ToolResult::error("Rate limit exceeded. Please retry later.");
            return Ok(JsonRpcResponse::success(
                request.id,
                serde_json::to_value(result)?,
            ));
        }

        let arguments = params.arguments.unwrap_or(Value::Null);
        let call = self.track_call(request.id.as_ref());
        let response = self
            .dispatcher
            .dispatch_with_cancel(&params.name, &arguments, call.flag.clone())
            .await;
        drop(call);

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(to_tool_result(response))?,
        ))
    }

    /// Handle notifications/cancelled: raise the flag of the named call.
    ///
    /// Unknown or finished request ids are ignored.
    pub async fn handle_cancelled(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let Some(request_id) = request.params.as_ref().and_then(|p| p.get("requestId")) else {
            debug!("Cancellation without requestId ignored");
            return Ok(JsonRpcResponse::none());
        };

        let key = request_id.to_string();
        let flag = self
            .in_flight
            .lock()
            .ok()
            .and_then(|in_flight| in_flight.get(&key).cloned());

        match flag {
            Some(flag) => {
                info!("Cancelling tool call {}", key);
                flag.cancel();
            }
            None => debug!("Cancellation for unknown request {}", key),
        }

        Ok(JsonRpcResponse::none())
    }

    /// Handle ping request
    pub async fn handle_ping(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        Ok(JsonRpcResponse::success(request.id, json!({})))
    }
}

/// Success texts become text blocks; an error becomes one text block
/// holding the JSON error envelope, flagged `isError`.
fn to_tool_result(response: OperationResponse) -> ToolResult {
    match response {
        OperationResponse::Success { content } => ToolResult {
            content: content
                .into_iter()
                .map(|block| ContentBlock::Text {
                    text: block.text.into_inner(),
                })
                .collect(),
            is_error: false,
        },
        failure @ OperationResponse::Failure { .. } => ToolResult::error(failure.to_json()),
    }
}
