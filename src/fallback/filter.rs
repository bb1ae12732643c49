//! Request descriptor and fast-reject filter.
//!
//! # Responsibilities
//! - Capture the request fields resolution depends on
//! - Decide cheaply whether a request is eligible for fallback
//!
//! # Design Decisions
//! - Only GET and HEAD are eligible
//! - `/favicon.ico` is compared against the raw target, query included
//! - Missing or empty `Accept` means `*/*`

use axum::http::{header, Method, Request};

const FAVICON_URL: &str = "/favicon.ico";

/// The `Accept` header as seen by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accept {
    /// Header not sent.
    Missing,
    /// Header value (may be empty), bytes read as latin-1.
    Value(String),
}

impl Accept {
    /// Returns true if the client accepts an HTML response.
    pub fn accepts_html(&self) -> bool {
        match self {
            Accept::Missing => true,
            Accept::Value(v) => v.is_empty() || v.contains("text/html") || v.contains("*/*"),
        }
    }
}

/// Per-request input to resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Raw request target: path plus optional query.
    pub url: String,
    pub accept: Accept,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            accept: Accept::Missing,
        }
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Accept::Value(accept.into());
        self
    }

    /// Capture method, target and `Accept` from an HTTP request.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.uri().path())
            .to_string();

        let accept = match req.headers().get(header::ACCEPT) {
            None => Accept::Missing,
            Some(value) => Accept::Value(value.as_bytes().iter().map(|&b| char::from(b)).collect()),
        };

        Self {
            method: req.method().clone(),
            url,
            accept,
        }
    }
}

/// Why a request was not considered for fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Method,
    Favicon,
    NotHtml,
}

/// Returns the reason to skip resolution, or `None` if the request is eligible.
pub fn skip_reason(req: &RequestDescriptor) -> Option<SkipReason> {
    if req.method != Method::GET && req.method != Method::HEAD {
        return Some(SkipReason::Method);
    }
    if req.url == FAVICON_URL {
        return Some(SkipReason::Favicon);
    }
    if !req.accept.accepts_html() {
        return Some(SkipReason::NotHtml);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_methods() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS, Method::PATCH] {
            let req = RequestDescriptor::new(method, "/about");
            assert_eq!(skip_reason(&req), Some(SkipReason::Method));
        }
        assert_eq!(skip_reason(&RequestDescriptor::new(Method::GET, "/about")), None);
        assert_eq!(skip_reason(&RequestDescriptor::new(Method::HEAD, "/about")), None);
    }

    #[test]
    fn test_favicon_exact_match() {
        let req = RequestDescriptor::new(Method::GET, "/favicon.ico");
        assert_eq!(skip_reason(&req), Some(SkipReason::Favicon));

        // The raw target is compared, so a query string makes it eligible.
        let req = RequestDescriptor::new(Method::GET, "/favicon.ico?v=2");
        assert_eq!(skip_reason(&req), None);
    }

    #[test]
    fn test_accept_header() {
        let html = RequestDescriptor::new(Method::GET, "/").with_accept("text/html,application/xhtml+xml");
        assert_eq!(skip_reason(&html), None);

        let any = RequestDescriptor::new(Method::GET, "/").with_accept("application/json, */*;q=0.1");
        assert_eq!(skip_reason(&any), None);

        let empty = RequestDescriptor::new(Method::GET, "/").with_accept("");
        assert_eq!(skip_reason(&empty), None);

        let json = RequestDescriptor::new(Method::GET, "/").with_accept("application/json");
        assert_eq!(skip_reason(&json), Some(SkipReason::NotHtml));
    }

    #[test]
    fn test_from_request() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("http://localhost:5173/docs/?tab=api")
            .header("Accept", "text/html")
            .body(Body::empty())
            .unwrap();
        let desc = RequestDescriptor::from_request(&req);
        assert_eq!(desc.method, Method::HEAD);
        assert_eq!(desc.url, "/docs/?tab=api");
        assert_eq!(desc.accept, Accept::Value("text/html".into()));
    }

    #[test]
    fn test_non_ascii_accept_is_read_as_latin1() {
        let mut req = Request::builder().uri("/").body(Body::empty()).unwrap();
        req.headers_mut().insert(
            header::ACCEPT,
            HeaderValue::from_bytes(b"text/html\xff").unwrap(),
        );
        let desc = RequestDescriptor::from_request(&req);
        assert_eq!(desc.accept, Accept::Value("text/html\u{ff}".into()));
        assert_eq!(skip_reason(&desc), None);

        req.headers_mut().insert(
            header::ACCEPT,
            HeaderValue::from_bytes(b"application/json; charset=\xe9").unwrap(),
        );
        let desc = RequestDescriptor::from_request(&req);
        assert_eq!(skip_reason(&desc), Some(SkipReason::NotHtml));
    }
}
