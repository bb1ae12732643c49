//! HTML fallback resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, url, Accept)
//!     → filter.rs (fast reject: method, favicon, Accept)
//!     → path.rs (clean URL, strict percent-decode)
//!     → resolver.rs (pick one strategy by suffix)
//!         .html          → probe path as-is
//!         trailing "/"   → probe path + index.html
//!         anything else  → probe path + .html
//!     → root.rs (lexical join, canonicalize, containment)
//!     → overlay.rs (in-memory files answer first)
//!     → Return: Rewrite { url } or PassThrough
//! ```
//!
//! # Design Decisions
//! - Exactly one candidate per request, no extension guessing
//! - Every failure degrades to "not found" or pass-through, never an error
//! - Containment is checked on the symlink-resolved path
//! - Root is resolved once; a bad root fails construction, not requests

pub mod filter;
pub mod overlay;
pub mod path;
pub mod resolver;
pub mod root;

pub use filter::{Accept, RequestDescriptor, SkipReason};
pub use overlay::{NoVirtualFiles, VirtualFiles};
pub use resolver::{FallbackResolver, Resolution, RewriteEvent, RewriteHook, Strategy};
pub use root::{ProjectRoot, RootError};
