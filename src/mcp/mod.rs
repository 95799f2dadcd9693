//! MCP (Model Context Protocol) server module
//!
//! This module implements a JSON-RPC 2.0 compliant MCP server that
//! exposes the gateway operations as MCP tools over stdio.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod rate_limit;
pub mod server;
pub mod transport;

// Re-export main types
pub use error::McpError;
pub use handlers::ProtocolHandlers;
pub use rate_limit::TokenBucket;
pub use server::McpServer;
