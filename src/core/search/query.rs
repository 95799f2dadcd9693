//! Search query and outcome types.
//!
//! Queries are plain literal substrings: no regex, no query syntax, no
//! case folding. File-type filters are normalised to a lower-case
//! extension with a leading '.', so ".RS", "rs" and ".rs" all select
//! Rust files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A bounded content search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Literal, case-sensitive needle
    pub text: String,
    /// Normalised extensions; empty means every file
    pub file_types: Vec<String>,
    pub max_results: usize,
    pub max_bytes_per_file: u64,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, max_results: usize, max_bytes_per_file: u64) -> Self {
        Self {
            text: text.into(),
            file_types: Vec::new(),
            max_results,
            max_bytes_per_file,
        }
    }

    pub fn with_file_types<I, S>(mut self, file_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_types = normalize_file_types(file_types);
        self
    }

    /// Check a file name against the file-type filter
    pub fn matches_file_type(&self, path: &Path) -> bool {
        if self.file_types.is_empty() {
            return true;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = format!(".{}", ext.to_lowercase());
                self.file_types.contains(&ext)
            }
            None => false,
        }
    }
}

/// Normalise extensions to ".ext" in lower case, dropping empty ones
pub fn normalize_file_types<I, S>(file_types: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = file_types
        .into_iter()
        .filter_map(|ft| {
            let ft = ft.as_ref().trim().trim_start_matches('.').to_lowercase();
            (!ft.is_empty()).then(|| format!(".{ft}"))
        })
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// A single matching line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Path relative to the traversal root, '/'-separated
    pub path: String,
    /// 1-based line number
    pub line: usize,
    /// Redacted and length-limited line text
    pub snippet: String,
}

/// Everything a search produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,
    /// Service name, or "project" for the whole project root
    pub scope: String,
    pub total: usize,
    /// Result cap or time budget hit before the tree was exhausted
    pub truncated: bool,
    pub files_scanned: usize,
    pub skipped_large: usize,
    pub skipped_binary: usize,
    pub unreadable: usize,
    pub results: Vec<SearchResult>,
}

impl SearchOutcome {
    pub fn empty(query: &str, scope: &str) -> Self {
        Self {
            query: query.to_string(),
            scope: scope.to_string(),
            total: 0,
            truncated: false,
            files_scanned: 0,
            skipped_large: 0,
            skipped_binary: 0,
            unreadable: 0,
            results: Vec::new(),
        }
    }
}
