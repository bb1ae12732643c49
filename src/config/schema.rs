//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the development server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevServerConfig {
    /// Listener and request settings.
    pub server: ServerConfig,

    /// HTML fallback settings.
    pub fallback: FallbackConfig,

    /// Client build environment.
    pub environment: EnvironmentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5173".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Kind of application being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    /// Single-page app: unknown HTML routes fall back to `/index.html`.
    #[default]
    Spa,
    /// Multi-page app: `.html` and `index.html` resolution, no SPA fallback.
    Mpa,
    /// No HTML fallback at all.
    Custom,
}

impl AppType {
    /// Whether the fallback middleware is installed.
    pub fn uses_fallback(self) -> bool {
        !matches!(self, AppType::Custom)
    }

    /// Whether a total miss is rewritten to `/index.html`.
    pub fn spa_fallback(self) -> bool {
        matches!(self, AppType::Spa)
    }
}

impl std::str::FromStr for AppType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spa" => Ok(AppType::Spa),
            "mpa" => Ok(AppType::Mpa),
            "custom" => Ok(AppType::Custom),
            other => Err(format!("unknown app type '{other}' (expected spa, mpa or custom)")),
        }
    }
}

/// HTML fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Project root served by the dev server.
    pub root: PathBuf,

    /// Application type.
    pub app_type: AppType,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            app_type: AppType::default(),
        }
    }
}

/// Client build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    #[default]
    Standard,
    /// Client bundled in memory; files may have no disk entry.
    FullBundle,
}

/// Client environment configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub mode: EnvironmentMode,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}
