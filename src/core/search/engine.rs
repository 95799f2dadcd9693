//! Bounded literal content search.
//!
//! Walks a tree in file-name order without following symlinks, applies
//! the shared `PathPolicy` to every entry (pruning blocked directories
//! early) and scans each surviving file line by line. The walk stops
//! at the result cap, at the time budget, or when cancelled.

use crate::core::error::{GatewayError, Result};
use crate::core::files::{decode_utf8, read_bounded};
use crate::core::policy::PathPolicy;
use crate::core::redact::{redact, PLACEHOLDER};
use crate::core::resolver::to_slash_relative;
use crate::core::search::cancel::CancelFlag;
use crate::core::search::query::{SearchOutcome, SearchQuery, SearchResult};
use std::cell::Cell;
use std::path::Path;
use std::time::{Duration, Instant};
use walkdir::{DirEntry, WalkDir};

/// Cross-service search engine
#[derive(Debug, Clone)]
pub struct SearchEngine {
    policy: PathPolicy,
    snippet_max_chars: usize,
    time_budget: Duration,
}

enum FileScan {
    Scanned,
    Large,
    Binary,
    Unreadable,
}

impl SearchEngine {
    /// Create a new search engine
    pub fn new(policy: PathPolicy, snippet_max_chars: usize, time_budget: Duration) -> Self {
        Self {
            policy,
            snippet_max_chars,
            time_budget,
        }
    }

    /// Search every allowed file under `root`.
    ///
    /// `root` must already be a real, resolved directory; result paths
    /// are relative to it. `scope` is echoed back in the outcome.
    ///
    /// Fails with `Truncated` only when `cancel` is raised; hitting the
    /// result cap or the time budget returns a partial outcome.
    pub fn search(
        &self,
        root: &Path,
        scope: &str,
        query: &SearchQuery,
        cancel: &CancelFlag,
    ) -> Result<SearchOutcome> {
        let start = Instant::now();
        let deadline = start + self.time_budget;
        let mut outcome = SearchOutcome::empty(&query.text, scope);
        let unnamed = Cell::new(0usize);

        if query.max_results == 0 {
            outcome.truncated = true;
            return Ok(outcome);
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_visit(e, root, &unnamed))
        {
            if cancel.is_cancelled() {
                tracing::debug!("Search for {:?} cancelled", query.text);
                return Err(GatewayError::Truncated("search was cancelled".to_string()));
            }

            if Instant::now() >= deadline {
                tracing::warn!(
                    "Search time budget of {:?} exhausted after {} files",
                    self.time_budget,
                    outcome.files_scanned
                );
                outcome.truncated = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    outcome.unreadable += 1;
                    continue;
                }
            };

            // Symlinks report their own type with follow_links(false)
            if !entry.file_type().is_file() || !query.matches_file_type(entry.path()) {
                continue;
            }

            let Some(relative) = to_slash_relative(entry.path(), root) else {
                continue;
            };

            match self.scan_file(&entry, &relative, query, &mut outcome.results) {
                FileScan::Scanned => outcome.files_scanned += 1,
                FileScan::Large => outcome.skipped_large += 1,
                FileScan::Binary => outcome.skipped_binary += 1,
                FileScan::Unreadable => outcome.unreadable += 1,
            }

            if outcome.results.len() >= query.max_results {
                outcome.results.truncate(query.max_results);
                outcome.truncated = true;
                break;
            }
        }

        outcome.total = outcome.results.len();
        outcome.unreadable += unnamed.get();

        tracing::debug!(
            "Search for {:?} in {}: {} matches, {} files scanned in {}ms",
            query.text,
            scope,
            outcome.total,
            outcome.files_scanned,
            start.elapsed().as_millis()
        );

        Ok(outcome)
    }

    /// Policy filter applied while walking; never filters the root.
    ///
    /// Entries whose path is not valid UTF-8 are pruned and counted in
    /// `unnamed`.
    fn should_visit(&self, entry: &DirEntry, root: &Path, unnamed: &Cell<usize>) -> bool {
        if entry.path() == root {
            return true;
        }

        match to_slash_relative(entry.path(), root) {
            Some(relative) if self.policy.allows(&relative) => true,
            Some(relative) => {
                tracing::debug!("Skipping {:?} (policy)", relative);
                false
            }
            None => {
                tracing::debug!("Skipping non-UTF-8 path {:?}", entry.path());
                unnamed.set(unnamed.get() + 1);
                false
            }
        }
    }

    fn scan_file(
        &self,
        entry: &DirEntry,
        relative: &str,
        query: &SearchQuery,
        results: &mut Vec<SearchResult>,
    ) -> FileScan {
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!("Cannot stat {:?}: {}", relative, e);
                return FileScan::Unreadable;
            }
        };

        if size > query.max_bytes_per_file {
            tracing::debug!("Skipping large file: {:?} ({} bytes)", relative, size);
            return FileScan::Large;
        }

        let (bytes, overflowed) = match read_bounded(entry.path(), query.max_bytes_per_file) {
            Ok(read) => read,
            Err(e) => {
                tracing::warn!("Cannot read {:?}: {}", relative, e);
                return FileScan::Unreadable;
            }
        };

        // File grew between stat and read
        if overflowed {
            return FileScan::Large;
        }

        let text = match decode_utf8(bytes, false) {
            Some(text) if !text.contains('\0') => text,
            _ => {
                tracing::debug!("Skipping binary file: {:?}", relative);
                return FileScan::Binary;
            }
        };

        // Lines are redacted one at a time, which cannot see a key
        // block spanning several lines; its body lines are masked here.
        let mut in_key_block = false;
        for (index, line) in text.lines().enumerate() {
            if results.len() >= query.max_results {
                break;
            }

            let marker = key_block_marker(line);
            let inside_key = in_key_block && marker.is_none();
            if let Some(begins) = marker {
                in_key_block = begins;
            }

            if line.contains(query.text.as_str()) {
                let snippet = if inside_key {
                    PLACEHOLDER.to_string()
                } else {
                    self.snippet(line)
                };
                results.push(SearchResult {
                    path: relative.to_string(),
                    line: index + 1,
                    snippet,
                });
            }
        }

        FileScan::Scanned
    }

    /// Redact first, then cut, so a secret is never split past the
    /// rules' reach.
    fn snippet(&self, line: &str) -> String {
        // A lone BEGIN marker redacts to several lines
        let redacted = redact(line.trim()).replace(['\r', '\n'], " ");
        let redacted = redacted.trim_end().to_string();
        if redacted.chars().count() <= self.snippet_max_chars {
            redacted
        } else {
            redacted.chars().take(self.snippet_max_chars).collect()
        }
    }
}

/// `Some(true)` on a line opening a private key block, `Some(false)`
/// on one closing it
fn key_block_marker(line: &str) -> Option<bool> {
    if !line.contains("PRIVATE KEY-----") {
        return None;
    }
    match (line.contains("-----BEGIN "), line.contains("-----END ")) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}
