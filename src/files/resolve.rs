//! Path resolution.
//!
//! Maps an untrusted, already percent-decoded request path to a node under
//! the served root. Traversal is blocked twice: lexically (a `..` that
//! would climb above the root) and physically (a symlink whose target
//! escapes the root). Both cases resolve to [`ResolvedTarget::NotFound`]
//! so nothing about the real filesystem layout leaks to the client.
//!
//! Resolution only performs metadata lookups; file contents are never
//! opened at this stage.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// One immediate child of a resolved directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// The outcome of mapping a request path to a filesystem node.
///
/// Invariant: an absolute path carried here is always a descendant of the
/// served root. Created fresh per request, never persisted.
#[derive(Debug)]
pub enum ResolvedTarget {
    /// A regular file and its size in bytes.
    File { path: PathBuf, size: u64 },
    /// A directory and its sorted immediate children.
    Directory { path: PathBuf, entries: Vec<Entry> },
    /// No node matches, or the path escapes the served root.
    NotFound,
}

/// Resolves a decoded request path against the served root.
///
/// `root` must already be canonicalized (the dispatcher does this once at
/// construction). Expected misses return `Ok(NotFound)`; only genuinely
/// unexpected I/O failures (e.g. permission errors on metadata) surface
/// as `Err`, which the dispatcher turns into a 500.
pub async fn resolve(root: &Path, request_path: &str) -> io::Result<ResolvedTarget> {
    let Some(relative) = normalize(request_path) else {
        tracing::debug!(path = %request_path, "request path climbs above served root");
        return Ok(ResolvedTarget::NotFound);
    };

    let candidate = root.join(relative);

    let metadata = match fs::metadata(&candidate).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(ResolvedTarget::NotFound);
        }
        Err(e) => return Err(e),
    };

    // Containment check after following symlinks. A node that vanished
    // between the two lookups is treated as missing.
    let canonical = match fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(_) => return Ok(ResolvedTarget::NotFound),
    };
    if !canonical.starts_with(root) {
        tracing::debug!(path = %request_path, "symlink target escapes served root");
        return Ok(ResolvedTarget::NotFound);
    }

    if metadata.is_dir() {
        let entries = list_entries(&canonical).await?;
        Ok(ResolvedTarget::Directory {
            path: canonical,
            entries,
        })
    } else if metadata.is_file() {
        Ok(ResolvedTarget::File {
            path: canonical,
            size: metadata.len(),
        })
    } else {
        // Sockets, FIFOs and the like are not servable.
        Ok(ResolvedTarget::NotFound)
    }
}

/// Collapses `.`/`..` segments lexically.
///
/// Returns `None` when a `..` would pop past the root. Empty segments
/// (from duplicate or trailing slashes) are dropped.
fn normalize(request_path: &str) -> Option<PathBuf> {
    let mut parts: Vec<&str> = Vec::new();

    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.iter().collect())
}

/// Reads a directory's immediate children, sorted for deterministic
/// rendering: directories before files, then case-insensitive by name
/// (exact name as the final tie-break).
async fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;

    while let Some(dirent) = reader.next_entry().await? {
        let is_dir = dirent.file_type().await?.is_dir();
        entries.push(Entry {
            name: dirent.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(entries)
}
