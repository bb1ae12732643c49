//! Client build environment.
//!
//! # Data Flow
//! ```text
//! Standard mode:
//!     files on disk → static stage
//!
//! Full bundle mode:
//!     bundler writes MemoryFiles (shared handle)
//!     → fallback resolver treats keys as existing files
//!     → memory stage serves their content before the static stage
//! ```
//!
//! # Design Decisions
//! - The resolver only needs the `VirtualFiles` capability, not the mode
//! - `MemoryFiles` is owned by the bundler; the server holds read access

mod memory;

use std::sync::Arc;

pub use memory::MemoryFiles;

use crate::fallback::VirtualFiles;

/// How the client application is being built for development.
#[derive(Debug, Clone, Default)]
pub enum ClientEnvironment {
    /// Files are served from disk as they are.
    #[default]
    Standard,
    /// The application is bundled in memory; some files have no disk entry.
    FullBundle(MemoryFiles),
}

impl ClientEnvironment {
    /// The in-memory file overlay, if this environment has one.
    pub fn virtual_files(&self) -> Option<Arc<dyn VirtualFiles>> {
        match self {
            ClientEnvironment::Standard => None,
            ClientEnvironment::FullBundle(files) => Some(Arc::new(files.clone())),
        }
    }

    /// The memory file store, if this environment has one.
    pub fn memory_files(&self) -> Option<&MemoryFiles> {
        match self {
            ClientEnvironment::Standard => None,
            ClientEnvironment::FullBundle(files) => Some(files),
        }
    }
}
