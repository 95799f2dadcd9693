//! Search module for bounded literal content search.
//!
//! This module provides the cross-service search used by the
//! `search` operation: a walkdir-based traversal with per-file byte
//! caps, a result cap, a time budget and cooperative cancellation.

mod cancel;
mod engine;
mod query;

pub use cancel::{CancelFlag, CancelGuard};
pub use engine::SearchEngine;
pub use query::{normalize_file_types, SearchOutcome, SearchQuery, SearchResult};
