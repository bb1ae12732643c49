//! HTML fallback middleware.
//! Rewrites the request URI before the static stages see it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::fallback::{FallbackResolver, RequestDescriptor, Resolution};

pub async fn html_fallback_middleware(
    State(resolver): State<Arc<FallbackResolver>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let descriptor = RequestDescriptor::from_request(&req);

    if let Resolution::Rewrite { url, .. } = resolver.resolve_async(descriptor).await {
        match rewrite_uri(req.uri(), &url) {
            Some(uri) => *req.uri_mut() = uri,
            None => warn!(url = %url, "Rewritten URL is not a valid URI, forwarding unchanged"),
        }
    }

    next.run(req).await
}

/// Replace path and query of `uri`, keeping scheme and authority.
fn rewrite_uri(uri: &Uri, path: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path).ok()?);
    Uri::from_parts(parts).ok()
}
