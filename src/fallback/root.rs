//! Project root and containment checks.
//!
//! # Responsibilities
//! - Resolve the configured root once (absolute + symlink-free)
//! - Map a root-relative request path onto a filesystem candidate
//! - Reject any candidate whose real path leaves the root
//!
//! # Design Decisions
//! - Containment is component-wise (`/site2` is not inside `/site`)
//! - The check runs on the canonical path, after symlinks are followed
//! - Lexical escapes (`/../x`) are rejected before any syscall

use std::io;
use std::path::{Path, PathBuf};

use crate::fallback::path::normalize;

/// Fatal error raised while constructing a [`ProjectRoot`].
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("project root {} cannot be resolved: {source}", .path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("project root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Outcome of probing one candidate on the real filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Canonical path exists and is inside the root.
    Found(PathBuf),
    /// Nothing on disk (missing, broken symlink, permission denied).
    Missing,
    /// The candidate, lexically or after symlinks, lies outside the root.
    Escaped(PathBuf),
}

/// The directory requests are resolved against.
#[derive(Debug, Clone)]
pub struct ProjectRoot {
    /// Absolute, lexically normalized root as configured.
    base: PathBuf,
    /// Canonical root with symlinks resolved.
    real: PathBuf,
}

impl ProjectRoot {
    /// Resolve `root` (absolute or relative to the working directory).
    pub fn new(root: impl AsRef<Path>) -> Result<Self, RootError> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(RootError::CurrentDir)?
                .join(root)
        };
        let base = normalize(&absolute);

        let real = base.canonicalize().map_err(|source| RootError::Unresolvable {
            path: base.clone(),
            source,
        })?;
        if !real.is_dir() {
            return Err(RootError::NotADirectory(real));
        }

        tracing::debug!(base = %base.display(), real = %real.display(), "Project root resolved");
        Ok(Self { base, real })
    }

    /// Canonical root path.
    pub fn path(&self) -> &Path {
        &self.real
    }

    /// Returns true if `real_path` equals the root or is nested under it.
    pub fn contains(&self, real_path: &Path) -> bool {
        real_path.starts_with(&self.real)
    }

    /// Join a root-relative URL path (`/a/b.html`) onto the root.
    ///
    /// The leading `/` is relative to the root, never the filesystem root.
    pub fn candidate(&self, relative: &str) -> PathBuf {
        let trimmed = relative.trim_start_matches('/');
        normalize(&self.base.join(trimmed))
    }

    /// Probe a root-relative path on disk.
    pub fn probe(&self, relative: &str) -> Probe {
        let candidate = self.candidate(relative);
        if !candidate.starts_with(&self.base) {
            return Probe::Escaped(candidate);
        }

        let Ok(real) = candidate.canonicalize() else {
            return Probe::Missing;
        };
        if self.contains(&real) {
            Probe::Found(real)
        } else {
            Probe::Escaped(real)
        }
    }
}
