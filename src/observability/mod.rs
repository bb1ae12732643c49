//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (filter + formatter)
//!     → stdout (pretty or JSON)
//!
//! Per request:
//!     → TraceLayer span (method, uri, status, latency)
//!     → html_fallback rewrite events
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_tracing;
