//! Safe path resolution
//!
//! Turns a caller-supplied relative path into a verified absolute
//! path inside a service root. The lexical checks run before any
//! filesystem access; the containment check runs on the real path
//! after every symlink has been resolved, because a link placed
//! inside the root can point anywhere.
//!
//! All functions here block on the filesystem. Call them from the
//! blocking pool.

use crate::core::error::PathViolation;
use crate::core::policy::PathPolicy;
use crate::core::registry::ServiceDescriptor;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// A path that passed every containment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Real (symlink-free) absolute path
    pub absolute_path: PathBuf,
    /// Service the path belongs to
    pub service: String,
    /// Real path relative to the real service root, '/'-separated
    pub relative_path: String,
}

/// Resolves caller paths against a root under a `PathPolicy`
#[derive(Debug, Clone)]
pub struct PathResolver {
    policy: PathPolicy,
}

impl PathResolver {
    pub fn new(policy: PathPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    /// Resolve `relative` under `root`, failing closed.
    ///
    /// Returns the real path, which is `root` itself or a descendant of
    /// it on a component boundary.
    pub fn resolve_safe_path(&self, root: &Path, relative: &str) -> Result<PathBuf, PathViolation> {
        self.check_lexical(relative)?;

        let real_root = root.canonicalize().map_err(|e| {
            warn!("Service root {:?} cannot be resolved: {}", root, e);
            PathViolation::Unresolvable
        })?;

        let real = real_root.join(relative).canonicalize().map_err(|e| {
            debug!("Real path resolution failed for {:?}: {}", relative, e);
            PathViolation::Unresolvable
        })?;

        // Path::starts_with compares whole components, so "root-evil"
        // is not inside "root".
        let inside = real
            .strip_prefix(&real_root)
            .map_err(|_| {
                warn!("Path escape attempt: {:?} resolves outside {:?}", relative, real_root);
                PathViolation::Escape
            })?;

        // A symlink inside the root may alias a hidden or blocked entry.
        for component in inside.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or(PathViolation::Unresolvable)?;
                    self.policy.check_segment(segment)?;
                }
                _ => return Err(PathViolation::Escape),
            }
        }
        if let Some(inside) = inside.to_str() {
            self.policy.check_relative(inside)?;
        }

        Ok(real)
    }

    /// Resolve `relative` inside a service root
    pub fn resolve(
        &self,
        service: &ServiceDescriptor,
        relative: &str,
    ) -> Result<ResolvedPath, PathViolation> {
        let absolute_path = self.resolve_safe_path(&service.root_path, relative)?;

        let real_root = service
            .root_path
            .canonicalize()
            .map_err(|_| PathViolation::Unresolvable)?;
        let relative_path = to_slash_relative(&absolute_path, &real_root)
            .ok_or(PathViolation::Escape)?;

        Ok(ResolvedPath {
            absolute_path,
            service: service.name.clone(),
            relative_path,
        })
    }

    /// Checks that need no filesystem access
    fn check_lexical(&self, relative: &str) -> Result<(), PathViolation> {
        if relative.trim().is_empty() {
            return Err(PathViolation::Empty);
        }

        if relative.contains('\0') {
            return Err(PathViolation::NulByte);
        }

        if relative.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(PathViolation::Traversal);
        }

        if is_absolute_like(relative) {
            return Err(PathViolation::Absolute);
        }

        self.policy.check_relative(relative)
    }
}

/// Absolute in either convention, including Windows drive prefixes
fn is_absolute_like(path: &str) -> bool {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';

    path.starts_with('/') || path.starts_with('\\') || has_drive || Path::new(path).is_absolute()
}

/// `path` relative to `root` with '/' separators, "." for the root.
///
/// `None` when `path` is outside `root` or any component below it is
/// not valid UTF-8; such a path cannot be checked against the policy.
pub fn to_slash_relative(path: &Path, root: &Path) -> Option<String> {
    let inside = path.strip_prefix(root).ok()?;
    let parts = inside
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;

    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}
