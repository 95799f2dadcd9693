//! Core domain logic (protocol-agnostic)
//!
//! This module contains all file-access logic that is independent
//! of how requests arrive (MCP, CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **xdg**: XDG directory handling
//! - **registry**: Service name to root mapping
//! - **policy**: Hidden and blocked path rules
//! - **resolver**: Contained path resolution
//! - **redact**: Secret redaction and the `RedactedText` boundary type
//! - **files**: Bounded reads and directory listings
//! - **search**: Bounded literal content search
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod files;
pub mod policy;
pub mod redact;
pub mod registry;
pub mod resolver;
pub mod search;
pub mod services;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{ErrorCode, GatewayError, PathViolation, Result};
pub use services::Services;
