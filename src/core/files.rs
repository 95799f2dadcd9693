//! Bounded file reads and directory listings.
//!
//! Both operations expect an already resolved, contained path (see
//! `core::resolver`). Nothing here decides whether a path is allowed;
//! listings only filter the entries they return.

use crate::core::error::{GatewayError, Result};
use crate::core::policy::PathPolicy;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Result of a bounded read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Decoded text, at most `max_bytes` bytes
    pub text: String,
    /// Size of the file on disk
    pub total_bytes: u64,
    /// True if the file was larger than the cap
    pub truncated: bool,
}

/// Read at most `max_bytes` bytes of `path`.
///
/// Reads one extra byte to tell "exactly at the cap" apart from
/// "over the cap". Returns the bytes and whether the file overflowed.
pub fn read_bounded(path: &Path, max_bytes: u64) -> io::Result<(Vec<u8>, bool)> {
    let file = File::open(path)?;
    let mut buf = Vec::new();
    file.take(max_bytes.saturating_add(1)).read_to_end(&mut buf)?;

    let truncated = buf.len() as u64 > max_bytes;
    if truncated {
        buf.truncate(max_bytes as usize);
    }
    Ok((buf, truncated))
}

/// Decode bytes as UTF-8, tolerating a multi-byte character split at
/// the end of a truncated buffer.
pub fn decode_utf8(mut bytes: Vec<u8>, truncated: bool) -> Option<String> {
    match std::str::from_utf8(&bytes) {
        Ok(_) => {}
        // error_len() == None means the input ended mid-character
        Err(e) if truncated && e.error_len().is_none() => bytes.truncate(e.valid_up_to()),
        Err(_) => return None,
    }
    String::from_utf8(bytes).ok()
}

/// Read a text file, bounded by `max_bytes`
pub fn read_file(path: &Path, max_bytes: u64) -> Result<FileContent> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(GatewayError::NotFound("path is not a file".to_string()));
    }

    let (bytes, truncated) = read_bounded(path, max_bytes)?;
    let text = decode_utf8(bytes, truncated).ok_or_else(|| {
        GatewayError::InvalidParams("file is not valid UTF-8 text".to_string())
    })?;

    if truncated {
        tracing::debug!(
            "Read of {:?} truncated at {} of {} bytes",
            path,
            max_bytes,
            metadata.len()
        );
    }

    Ok(FileContent {
        text,
        total_bytes: metadata.len(),
        truncated,
    })
}

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Service-relative, '/'-separated
    pub path: String,
    /// Byte size, files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// RFC 3339 modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// A directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub entries: Vec<ListEntry>,
    /// Visible entries before the cap was applied
    pub total: usize,
    pub truncated: bool,
}

/// List the direct children of `dir`.
///
/// `base` is the service-relative path of `dir` ("." for the root).
/// Hidden and blocked entries are omitted, as are names that are not
/// valid UTF-8; symlinks are reported as such and never followed.
/// Entries are sorted by name and capped at `max_entries`.
///
/// A directory that cannot be read to the end is an error, never a
/// shorter listing.
pub fn list_dir(dir: &Path, base: &str, policy: &PathPolicy, max_entries: usize) -> Result<Listing> {
    let metadata = fs::metadata(dir)?;
    if !metadata.is_dir() {
        return Err(GatewayError::NotFound("path is not a directory".to_string()));
    }

    collect_listing(fs::read_dir(dir)?, base, policy, max_entries)
}

fn collect_listing<I>(
    read_dir: I,
    base: &str,
    policy: &PathPolicy,
    max_entries: usize,
) -> Result<Listing>
where
    I: IntoIterator<Item = io::Result<fs::DirEntry>>,
{
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| {
            tracing::error!("Listing of {:?} failed part way: {}", base, e);
            e
        })?;

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!("Omitting non-UTF-8 entry name under {:?}", base);
            continue;
        };

        let path = join_relative(base, &name);
        if policy.check_relative(&path).is_err() {
            tracing::debug!("Omitting {:?} from listing (policy)", path);
            continue;
        }

        // symlink_metadata: report the link itself, not its target
        let (kind, size, modified) = match entry.path().symlink_metadata() {
            Ok(meta) => {
                let file_type = meta.file_type();
                let kind = if file_type.is_symlink() {
                    EntryKind::Symlink
                } else if file_type.is_dir() {
                    EntryKind::Directory
                } else if file_type.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };
                let size = (kind == EntryKind::File).then_some(meta.len());
                let modified = meta.modified().ok().map(format_time);
                (kind, size, modified)
            }
            Err(e) => {
                tracing::warn!("Cannot stat {:?}: {}", path, e);
                (EntryKind::Other, None, None)
            }
        };

        entries.push(ListEntry {
            name,
            kind,
            path,
            size,
            modified,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let total = entries.len();
    let truncated = total > max_entries;
    entries.truncate(max_entries);

    Ok(Listing {
        entries,
        total,
        truncated,
    })
}

fn join_relative(base: &str, name: &str) -> String {
    if base.is_empty() || base == "." {
        name.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}

fn format_time(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}
