//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → middleware/memory_files.rs (full bundle output)
//!     → middleware/root_guard.rs (404 outside the root)
//!     → ServeDir (existing assets)
//!     → on miss: middleware/html_fallback.rs (URI rewrite)
//!     → root guard → ServeDir (resolved .html / index.html / SPA entry)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use server::{DevServer, ServerError};
