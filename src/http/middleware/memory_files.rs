//! Memory file middleware.
//! Serves full-bundle output that has no file on disk.

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::environment::MemoryFiles;
use crate::fallback::path::decode_pathname;

pub async fn memory_files_middleware(
    State(files): State<MemoryFiles>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return next.run(req).await;
    }

    let Ok(path) = decode_pathname(req.uri().path()) else {
        return next.run(req).await;
    };
    let key = path.strip_prefix('/').unwrap_or(&path);
    let Some(content) = files.get(key) else {
        return next.run(req).await;
    };

    tracing::trace!(path = %key, bytes = content.len(), "Serving from memory");

    let content_type = mime_guess::from_path(key).first_or_octet_stream();
    let length = content.len();
    let body = if req.method() == Method::HEAD {
        Body::empty()
    } else {
        Body::from(content)
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        body,
    )
        .into_response()
}
