//! CLI command implementations
//!
//! Each operation command builds the same JSON arguments an MCP client
//! would send and passes them through the `RequestDispatcher`, so the
//! CLI gets identical validation, sandboxing and redaction.

pub mod completions;
pub mod config;
pub mod list;
pub mod read;
pub mod search;
pub mod structure;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use list::ListArgs;
pub use read::ReadArgs;
pub use search::SearchArgs;
pub use structure::StructureArgs;
