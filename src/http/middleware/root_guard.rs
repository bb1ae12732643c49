//! Root containment guard.
//! Answers 404 for any request whose real path lies outside the project root,
//! so symlinks inside the root cannot expose files beyond it.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::fallback::path::decode_pathname;
use crate::fallback::root::{Probe, ProjectRoot};

pub async fn root_guard_middleware(
    State(root): State<ProjectRoot>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Undecodable paths never reach a file; the static stage rejects them.
    let Ok(path) = decode_pathname(req.uri().path()) else {
        return next.run(req).await;
    };

    let probe = match tokio::task::spawn_blocking(move || root.probe(&path)).await {
        Ok(probe) => probe,
        Err(e) => {
            warn!(error = %e, "Root containment check failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if let Probe::Escaped(outside) = probe {
        debug!(
            path = %req.uri().path(),
            resolved = %outside.display(),
            "Request outside project root"
        );
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(req).await
}
