//! fallback-devserver
//!
//! Serves a project directory for local development and rewrites HTML
//! navigations the way a client-side app expects.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ trace/timeout ─▶ memory files ─▶ static assets
//!                                                          │ miss
//!                                                          ▼
//!                                                   html fallback
//!                                          (.html | index.html | SPA entry)
//!                                                          │ rewritten URI
//!                                                          ▼
//!     Client Response ◀──────────────────────────── static files
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fallback_devserver::config::{self, AppType, DevServerConfig, EnvironmentMode};
use fallback_devserver::environment::{ClientEnvironment, MemoryFiles};
use fallback_devserver::lifecycle::{signals, Shutdown};
use fallback_devserver::observability;
use fallback_devserver::DevServer;

#[derive(Parser)]
#[command(name = "fallback-devserver")]
#[command(about = "Development server with HTML and SPA fallback", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root to serve (overrides the config file).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:5173.
    #[arg(short, long)]
    bind: Option<String>,

    /// spa, mpa or custom.
    #[arg(long)]
    app_type: Option<AppType>,

    /// trace, debug, info, warn or error.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut DevServerConfig) {
        if let Some(root) = self.root {
            config.fallback.root = root;
        }
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(app_type) = self.app_type {
            config.fallback.app_type = app_type;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => DevServerConfig::default(),
    };
    cli.apply(&mut config);
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    observability::init_tracing(&config.observability)?;
    tracing::info!(
        bind_address = %config.server.bind_address,
        root = %config.fallback.root.display(),
        app_type = ?config.fallback.app_type,
        "Configuration loaded"
    );

    let environment = match config.environment.mode {
        EnvironmentMode::Standard => ClientEnvironment::Standard,
        // Populated by an embedding bundler; empty when run standalone.
        EnvironmentMode::FullBundle => ClientEnvironment::FullBundle(MemoryFiles::new()),
    };
    let listener_addr = config.server.bind_address.clone();
    let server = DevServer::new(config, environment)?;

    let listener = TcpListener::bind(&listener_addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
