//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the development pipeline
//! - Serve existing assets first, hand misses to the HTML fallback
//! - Refuse any path whose real location is outside the project root
//! - Wire up middleware (tracing, timeout, memory files)
//! - Bind to the listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DevServerConfig;
use crate::environment::ClientEnvironment;
use crate::fallback::{FallbackResolver, ProjectRoot, RootError};
use crate::http::middleware::{
    html_fallback_middleware, memory_files_middleware, root_guard_middleware,
};
use crate::lifecycle::shutdown;

/// Error type for server construction and serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Root(#[from] RootError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Development server for a project root.
pub struct DevServer {
    router: Router,
    config: DevServerConfig,
    root: ProjectRoot,
}

impl DevServer {
    /// Build the server. Fails if the project root cannot be resolved.
    pub fn new(config: DevServerConfig, environment: ClientEnvironment) -> Result<Self, ServerError> {
        let root = ProjectRoot::new(&config.fallback.root)?;

        let app_type = config.fallback.app_type;
        let resolver = app_type.uses_fallback().then(|| {
            Arc::new(
                FallbackResolver::from_root(root.clone(), app_type.spa_fallback())
                    .with_environment(&environment),
            )
        });

        let router = Self::build_router(&config, &root, resolver, &environment);
        Ok(Self {
            router,
            config,
            root,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// ```text
    /// memory files → root guard → static assets
    ///     ─ miss ─→ HTML fallback → memory files → root guard → static files
    /// ```
    ///
    /// The HTML stage registers no routes: every request reaches its fallback
    /// service, so a URI rewritten by a layer is what the static stage sees.
    /// `ServeDir` follows symlinks, so each static stage sits behind the guard.
    #[allow(deprecated)]
    fn build_router(
        config: &DevServerConfig,
        root: &ProjectRoot,
        resolver: Option<Arc<FallbackResolver>>,
        environment: &ClientEnvironment,
    ) -> Router {
        let router = match resolver {
            Some(resolver) => {
                let html = with_memory_files(
                    guarded(Router::new().fallback_service(ServeDir::new(root.path())), root),
                    environment,
                )
                .layer(middleware::from_fn_with_state(
                    resolver,
                    html_fallback_middleware,
                ));
                guarded(
                    Router::new().fallback_service(ServeDir::new(root.path()).fallback(html)),
                    root,
                )
            }
            None => guarded(Router::new().fallback_service(ServeDir::new(root.path())), root),
        };

        with_memory_files(router, environment)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.root.path().display(),
            app_type = ?self.config.fallback.app_type,
            "Dev server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }
}

/// Reject requests for paths that resolve outside `root`.
fn guarded(router: Router, root: &ProjectRoot) -> Router {
    router.layer(middleware::from_fn_with_state(
        root.clone(),
        root_guard_middleware,
    ))
}

/// Serve the environment's in-memory files ahead of `router`, if it has any.
fn with_memory_files(router: Router, environment: &ClientEnvironment) -> Router {
    match environment.memory_files() {
        Some(files) => router.layer(middleware::from_fn_with_state(
            files.clone(),
            memory_files_middleware,
        )),
        None => router,
    }
}
