//! In-memory build output.

use std::sync::Arc;

use axum::body::Bytes;
use dashmap::DashMap;

use crate::fallback::VirtualFiles;

/// A thread-safe store of files produced by an in-memory bundle.
///
/// Cloning shares the same store. Keys are root-relative paths without a
/// leading `/` (`assets/app.js`).
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    inner: Arc<DashMap<String, Bytes>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<Bytes>) {
        let path = path.into();
        let key = path.strip_prefix('/').map(str::to_string).unwrap_or(path);
        self.inner.insert(key, content.into());
    }

    /// Remove a file, returning its content.
    pub fn remove(&self, path: &str) -> Option<Bytes> {
        self.inner.remove(path).map(|(_, content)| content)
    }

    /// Content of a file. `Bytes` clones are reference counted.
    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.inner.get(path).map(|r| r.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every file, e.g. before a full rebuild.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl VirtualFiles for MemoryFiles {
    fn has(&self, relative_path: &str) -> bool {
        self.contains(relative_path)
    }
}
