//! MCP server implementation

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::handlers::ProtocolHandlers;
use crate::mcp::protocol::*;
use crate::mcp::transport::StdioTransport;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub struct McpServer {
    transport: StdioTransport,
    handlers: Arc<ProtocolHandlers>,
}

impl McpServer {
    pub fn new(services: Services) -> Self {
        Self {
            transport: StdioTransport::new(),
            handlers: Arc::new(ProtocolHandlers::new(services)),
        }
    }

    /// Run the MCP server (blocking)
    ///
    /// Requests run as separate tasks so a `notifications/cancelled`
    /// can reach a call that is still running. Responses are written in
    /// completion order.
    pub async fn run(&mut self) -> Result<(), McpError> {
        info!("Starting fsgate MCP server");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin).lines();
        let (responses, mut completed) = mpsc::unbounded_channel::<JsonRpcResponse>();

        // Spawn signal handler
        let mut shutdown = tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
        });

        // Main loop
        loop {
            tokio::select! {
                // Process stdin messages
                line = reader.next_line() => {
                    match line? {
                        Some(line) if !line.trim().is_empty() => {
                            self.accept(line, &responses).await?;
                        }
                        None => break, // EOF
                        _ => continue,
                    }
                }

                Some(response) = completed.recv() => {
                    self.transport.send_response(response).await?;
                }

                // Handle Ctrl+C
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        // Answer requests still running; searches are time-bounded
        drop(responses);
        while let Some(response) = completed.recv().await {
            self.transport.send_response(response).await?;
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Notifications are routed before the next line is read; requests
    /// are spawned and answer through `responses`.
    async fn accept(
        &mut self,
        line: String,
        responses: &mpsc::UnboundedSender<JsonRpcResponse>,
    ) -> Result<(), McpError> {
        // Request lines can carry file paths; keep them at trace level
        tracing::trace!("Received: {}", line);

        let request = match parse_request(&line) {
            Ok(request) => request,
            Err(e) => return self.transport.send_response(error_response(e)).await,
        };

        if request.id.is_none() {
            let response = route(&self.handlers, request).await.unwrap_or_else(error_response);
            return self.transport.send_response(response).await;
        }

        let handlers = Arc::clone(&self.handlers);
        let responses = responses.clone();
        tokio::spawn(async move {
            let response = route(&handlers, request).await.unwrap_or_else(error_response);
            // The receiver lives until every sender is gone
            let _ = responses.send(response);
        });

        Ok(())
    }
}

fn error_response(e: McpError) -> JsonRpcResponse {
    error!("Error processing message: {}", e);
    JsonRpcResponse::error(None, e.code(), e.client_message())
}

fn parse_request(line: &str) -> Result<JsonRpcRequest, McpError> {
    serde_json::from_str(line).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Parse one JSON-RPC line and route it
pub async fn process_message(
    handlers: &ProtocolHandlers,
    line: &str,
) -> Result<JsonRpcResponse, McpError> {
    route(handlers, parse_request(line)?).await
}

async fn route(
    handlers: &ProtocolHandlers,
    request: JsonRpcRequest,
) -> Result<JsonRpcResponse, McpError> {
    if request.jsonrpc != "2.0" {
        return Ok(JsonRpcResponse::error(
            request.id,
            INVALID_REQUEST,
            "Unsupported jsonrpc version",
        ));
    }

    debug!("Handling method: {}", request.method);

    match request.method.as_str() {
        "initialize" => handlers.handle_initialize(request).await,
        "initialized" | "notifications/initialized" => {
            handlers.handle_initialized(request).await
        }
        "tools/list" => handlers.handle_tools_list(request).await,
        "tools/call" => handlers.handle_tools_call(request).await,
        "ping" => handlers.handle_ping(request).await,
        "notifications/cancelled" => handlers.handle_cancelled(request).await,
        // Other notifications need no answer
        method if request.id.is_none() && method.starts_with("notifications/") => {
            Ok(JsonRpcResponse::none())
        }
        _ => Ok(JsonRpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        )),
    }
}
