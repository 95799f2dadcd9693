//! fsgate - Sandboxed Multi-Service File Gateway
//!
//! Gives coding agents read, list and search access to a set of
//! named service subtrees of one project. Every path is confined to
//! its service root, sensitive files are hidden by policy, and
//! secrets are redacted from everything that leaves the gateway.
//!
//! # Architecture
//!
//! The codebase is organized into four modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, xdg
//!   - registry, policy, resolver (the sandbox)
//!   - redact (secret scrubbing)
//!   - files, search (bounded I/O)
//!   - services (unified service container)
//!
//! - **gateway**: Operation table, validation, dispatch and the
//!   response envelope (depends on core)
//!
//! - **mcp**: MCP stdio adapter (depends on gateway)
//!   - server, transport, handlers, protocol, rate limiting
//!
//! - **cli**: Command-line adapter (depends on gateway)
//!
//! # Key Properties
//!
//! - No path escapes its service root (lexical and symlink checks)
//! - Dotfiles, key material and credential files are never served
//! - Every outgoing text is redacted before it is built
//! - Reads and search scans are bounded by a byte cap
//! - Search is bounded by a result cap and a time budget

// Core domain logic (protocol-agnostic)
pub mod core;

// Operation dispatch shared by the adapters
pub mod gateway;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{ErrorCode, GatewayError, Result};
pub use core::redact::{RedactedText, Redactor};
pub use core::services::Services;
pub use gateway::{OperationKind, OperationResponse, RequestDispatcher};
