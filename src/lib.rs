//! Development server with HTML fallback resolution.

pub mod config;
pub mod environment;
pub mod fallback;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::DevServerConfig;
pub use environment::{ClientEnvironment, MemoryFiles};
pub use fallback::{FallbackResolver, Resolution};
pub use http::DevServer;
pub use lifecycle::Shutdown;
