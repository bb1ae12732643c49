//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → DevServerConfig (validated, immutable)
//!     → DevServer::new builds the resolver from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the project root never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppType, DevServerConfig, EnvironmentConfig, EnvironmentMode, FallbackConfig, LogFormat,
    ObservabilityConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationError};
