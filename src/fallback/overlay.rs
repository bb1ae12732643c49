//! Virtual file overlay capability.
//!
//! Some development modes keep built files only in memory. The resolver asks
//! the overlay before looking at the disk so those files count as existing.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Read-only view of files that exist without a filesystem entry.
///
/// Keys are root-relative with no leading `/` (`blog/index.html`).
pub trait VirtualFiles: Send + Sync + fmt::Debug {
    /// Returns true if `relative_path` is present in memory.
    fn has(&self, relative_path: &str) -> bool;
}

/// Overlay used when the environment has no in-memory files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVirtualFiles;

impl VirtualFiles for NoVirtualFiles {
    fn has(&self, _relative_path: &str) -> bool {
        false
    }
}

impl VirtualFiles for HashSet<String> {
    fn has(&self, relative_path: &str) -> bool {
        self.contains(relative_path)
    }
}

impl VirtualFiles for BTreeSet<String> {
    fn has(&self, relative_path: &str) -> bool {
        self.contains(relative_path)
    }
}
