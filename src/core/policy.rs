//! Hidden and blocked path policy
//!
//! One policy object is shared by the resolver and the search walker
//! so a file that cannot be read directly can never surface through
//! search either.

use crate::core::config::PolicyConfig;
use crate::core::error::PathViolation;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PathPolicy {
    allow_dotfiles: bool,
    /// Lower-case, with leading '.'
    blocked_extensions: Vec<String>,
    /// Lower-case
    blocked_substrings: Vec<String>,
}

impl PathPolicy {
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            allow_dotfiles: config.allow_dotfiles,
            blocked_extensions: config
                .blocked_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            blocked_substrings: config
                .blocked_substrings
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    pub fn allow_dotfiles(&self) -> bool {
        self.allow_dotfiles
    }

    /// Check a single path segment (a file or directory name)
    pub fn check_segment(&self, segment: &str) -> Result<(), PathViolation> {
        if segment.is_empty() || segment == "." {
            return Ok(());
        }

        if !self.allow_dotfiles && segment.starts_with('.') {
            return Err(PathViolation::Hidden(segment.to_string()));
        }

        if let Some(ext) = Path::new(segment).extension().and_then(|e| e.to_str()) {
            let ext = format!(".{}", ext.to_lowercase());
            if self.blocked_extensions.contains(&ext) {
                return Err(PathViolation::Blocked(segment.to_string()));
            }
        }

        let lower = segment.to_lowercase();
        if let Some(pattern) = self.blocked_substrings.iter().find(|p| lower.contains(*p)) {
            tracing::debug!("Segment {:?} matches blocked substring {:?}", segment, pattern);
            return Err(PathViolation::Blocked(segment.to_string()));
        }

        Ok(())
    }

    /// Check every segment of a relative path, splitting on both
    /// separator conventions, then the joined path for substrings that
    /// span segments (e.g. "config/secrets").
    pub fn check_relative(&self, relative: &str) -> Result<(), PathViolation> {
        for segment in relative.split(['/', '\\']) {
            self.check_segment(segment)?;
        }

        let normalized = relative.replace('\\', "/").to_lowercase();
        if let Some(pattern) = self
            .blocked_substrings
            .iter()
            .find(|p| normalized.contains(*p))
        {
            return Err(PathViolation::Blocked(pattern.clone()));
        }

        Ok(())
    }

    /// Convenience predicate for walkers
    pub fn allows(&self, relative: &str) -> bool {
        self.check_relative(relative).is_ok()
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}
