//! The HTML fallback decision.
//!
//! Given a [`RequestDescriptor`], [`FallbackResolver::resolve`] returns the
//! URL the request should be rewritten to, or [`Resolution::PassThrough`].
//! Nothing here returns an error: malformed URLs, missing files and root
//! escapes all end as a pass-through or an SPA rewrite.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, trace, warn};

use crate::environment::ClientEnvironment;
use crate::fallback::filter::{skip_reason, RequestDescriptor};
use crate::fallback::overlay::{NoVirtualFiles, VirtualFiles};
use crate::fallback::path::{clean_url, decode_pathname, join_url_segments};
use crate::fallback::root::{Probe, ProjectRoot, RootError};

const SPA_ENTRY: &str = "/index.html";

/// Which rule produced a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Path already ends in `.html`.
    Html,
    /// Trailing slash, served by the directory's `index.html`.
    DirectoryIndex,
    /// No extension, served by `<path>.html`.
    Extensionless,
    /// Nothing matched, rewritten to the application entry point.
    SpaFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Html => "html",
            Strategy::DirectoryIndex => "directory_index",
            Strategy::Extensionless => "extensionless",
            Strategy::SpaFallback => "spa_fallback",
        };
        f.write_str(name)
    }
}

/// Result of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Replace the request target with `url` (path only, query dropped).
    Rewrite { url: String, strategy: Strategy },
    /// Forward the request untouched.
    PassThrough,
}

/// Details handed to a [`RewriteHook`].
#[derive(Debug, Clone, Copy)]
pub struct RewriteEvent<'a> {
    pub method: &'a Method,
    pub from: &'a str,
    pub to: &'a str,
    pub strategy: Strategy,
}

/// Diagnostic callback invoked on every rewrite decision.
pub type RewriteHook = Arc<dyn Fn(&RewriteEvent<'_>) + Send + Sync>;

/// Decides how to rewrite requests that did not hit a static asset.
///
/// Built once at startup and shared across requests via `Arc`.
#[derive(Clone)]
pub struct FallbackResolver {
    root: ProjectRoot,
    spa_fallback: bool,
    overlay: Arc<dyn VirtualFiles>,
    hook: Option<RewriteHook>,
}

impl fmt::Debug for FallbackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackResolver")
            .field("root", &self.root)
            .field("spa_fallback", &self.spa_fallback)
            .field("overlay", &self.overlay)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl FallbackResolver {
    /// Create a resolver for `root`. Fails if the root cannot be resolved.
    pub fn new(root: impl AsRef<Path>, spa_fallback: bool) -> Result<Self, RootError> {
        Ok(Self::from_root(ProjectRoot::new(root)?, spa_fallback))
    }

    /// Create a resolver for an already resolved root.
    pub fn from_root(root: ProjectRoot, spa_fallback: bool) -> Self {
        Self {
            root,
            spa_fallback,
            overlay: Arc::new(NoVirtualFiles),
            hook: None,
        }
    }

    /// Consult `overlay` before the filesystem.
    pub fn with_overlay(mut self, overlay: Arc<dyn VirtualFiles>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Use the environment's in-memory files, if it has any.
    pub fn with_environment(self, environment: &ClientEnvironment) -> Self {
        match environment.virtual_files() {
            Some(overlay) => self.with_overlay(overlay),
            None => self,
        }
    }

    /// Register a callback for rewrite decisions.
    pub fn on_rewrite(mut self, hook: RewriteHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn spa_fallback(&self) -> bool {
        self.spa_fallback
    }

    /// Decide what to do with one request.
    pub fn resolve(&self, req: &RequestDescriptor) -> Resolution {
        if let Some(reason) = skip_reason(req) {
            trace!(method = %req.method, url = %req.url, ?reason, "Fallback skipped");
            return Resolution::PassThrough;
        }

        let url = clean_url(&req.url);
        let pathname = match decode_pathname(url) {
            Ok(p) => p,
            Err(e) => {
                debug!(url = %req.url, error = %e, "Malformed request path, passing through");
                return Resolution::PassThrough;
            }
        };

        let (candidate, rewritten, strategy) = if pathname.ends_with(".html") {
            (pathname, url.to_string(), Strategy::Html)
        } else if pathname.ends_with('/') {
            (
                join_url_segments(&pathname, "index.html"),
                format!("{url}index.html"),
                Strategy::DirectoryIndex,
            )
        } else {
            (
                format!("{pathname}.html"),
                format!("{url}.html"),
                Strategy::Extensionless,
            )
        };

        if self.file_exists(&candidate) {
            return self.rewrite(req, rewritten, strategy);
        }

        if self.spa_fallback {
            return self.rewrite(req, SPA_ENTRY.to_string(), Strategy::SpaFallback);
        }

        Resolution::PassThrough
    }

    /// Resolve on the blocking pool; filesystem probes are synchronous.
    pub async fn resolve_async(self: &Arc<Self>, req: RequestDescriptor) -> Resolution {
        if skip_reason(&req).is_some() {
            return Resolution::PassThrough;
        }

        let resolver = Arc::clone(self);
        match tokio::task::spawn_blocking(move || resolver.resolve(&req)).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(error = %e, "Fallback resolution task failed");
                Resolution::PassThrough
            }
        }
    }

    /// Returns true if the decoded, root-relative `relative` path exists.
    ///
    /// A path whose real location is outside the root never exists, even
    /// when the overlay lists it.
    pub fn file_exists(&self, relative: &str) -> bool {
        let probe = self.root.probe(relative);
        if let Probe::Escaped(ref outside) = probe {
            debug!(path = %relative, resolved = %outside.display(), "Candidate outside project root");
            return false;
        }

        let key = relative.strip_prefix('/').unwrap_or(relative);
        if self.overlay.has(key) {
            return true;
        }
        matches!(probe, Probe::Found(_))
    }

    fn rewrite(&self, req: &RequestDescriptor, url: String, strategy: Strategy) -> Resolution {
        debug!(
            target: "html_fallback",
            method = %req.method,
            from = %req.url,
            to = %url,
            %strategy,
            "Rewriting request"
        );
        if let Some(hook) = &self.hook {
            hook(&RewriteEvent {
                method: &req.method,
                from: &req.url,
                to: &url,
                strategy,
            });
        }
        Resolution::Rewrite { url, strategy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::Mutex;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("about.html"), "about").unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/index.html"), "blog").unwrap();
        dir
    }

    fn get(url: &str) -> RequestDescriptor {
        RequestDescriptor::new(Method::GET, url)
    }

    fn rewrite(url: &str, strategy: Strategy) -> Resolution {
        Resolution::Rewrite {
            url: url.to_string(),
            strategy,
        }
    }

    #[test]
    fn test_extensionless() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), false).unwrap();
        assert_eq!(resolver.resolve(&get("/about")), rewrite("/about.html", Strategy::Extensionless));
        assert_eq!(
            resolver.resolve(&get("/about?ref=nav")),
            rewrite("/about.html", Strategy::Extensionless)
        );
    }

    #[test]
    fn test_directory_index() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), false).unwrap();
        assert_eq!(
            resolver.resolve(&get("/blog/")),
            rewrite("/blog/index.html", Strategy::DirectoryIndex)
        );
        assert_eq!(resolver.resolve(&get("/")), rewrite("/index.html", Strategy::DirectoryIndex));
    }

    #[test]
    fn test_html_path_is_idempotent() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), true).unwrap();

        let first = resolver.resolve(&get("/about.html?x=1#frag"));
        assert_eq!(first, rewrite("/about.html", Strategy::Html));

        let again = resolver.resolve(&get("/about.html"));
        assert_eq!(again, first);
    }

    #[test]
    fn test_extensionless_does_not_probe_directory_index() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), false).unwrap();
        // Only /blog.html is probed; /blog/index.html is left to the static stage.
        assert_eq!(resolver.resolve(&get("/blog")), Resolution::PassThrough);
    }

    #[test]
    fn test_spa_fallback() {
        let dir = site();
        let spa = FallbackResolver::new(dir.path(), true).unwrap();
        assert_eq!(
            spa.resolve(&get("/missing/page")),
            rewrite("/index.html", Strategy::SpaFallback)
        );

        let mpa = FallbackResolver::new(dir.path(), false).unwrap();
        assert_eq!(mpa.resolve(&get("/missing/page")), Resolution::PassThrough);
    }

    #[test]
    fn test_skipped_requests_are_not_rewritten_even_with_spa() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), true).unwrap();

        let post = RequestDescriptor::new(Method::POST, "/about");
        assert_eq!(resolver.resolve(&post), Resolution::PassThrough);

        let json = get("/about").with_accept("application/json");
        assert_eq!(resolver.resolve(&json), Resolution::PassThrough);

        assert_eq!(resolver.resolve(&get("/favicon.ico")), Resolution::PassThrough);
    }

    #[test]
    fn test_malformed_encoding_passes_through() {
        let dir = site();
        let resolver = FallbackResolver::new(dir.path(), true).unwrap();
        assert_eq!(resolver.resolve(&get("/%E0%A4%A")), Resolution::PassThrough);
        assert_eq!(resolver.resolve(&get("/100%")), Resolution::PassThrough);
    }

    #[test]
    fn test_percent_encoded_names() {
        let dir = site();
        fs::write(dir.path().join("my page.html"), "spaces").unwrap();
        let resolver = FallbackResolver::new(dir.path(), false).unwrap();
        // The rewrite keeps the encoded form of the clean URL.
        assert_eq!(
            resolver.resolve(&get("/my%20page")),
            rewrite("/my%20page.html", Strategy::Extensionless)
        );
    }

    #[test]
    fn test_traversal_is_never_reported() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(dir.path().join("secret.html"), "secret").unwrap();
        let resolver = FallbackResolver::new(&site, false).unwrap();

        for url in ["/../secret", "/%2e%2e/secret", "/..%2Fsecret.html", "/a/%2E%2E/%2E%2E/secret.html"] {
            assert_eq!(resolver.resolve(&get(url)), Resolution::PassThrough, "{url}");
        }
        assert!(!resolver.file_exists("/../secret.html"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_never_reported() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(dir.path().join("secret.html"), "secret").unwrap();
        std::os::unix::fs::symlink(dir.path().join("secret.html"), site.join("leak.html")).unwrap();

        let overlay: HashSet<String> = ["leak.html".to_string()].into_iter().collect();
        let resolver = FallbackResolver::new(&site, true)
            .unwrap()
            .with_overlay(Arc::new(overlay));

        assert!(!resolver.file_exists("/leak.html"));
        assert_eq!(
            resolver.resolve(&get("/leak")),
            rewrite("/index.html", Strategy::SpaFallback)
        );
    }

    #[test]
    fn test_overlay_hit_without_file_on_disk() {
        let dir = site();
        let overlay: HashSet<String> = ["app.html".to_string()].into_iter().collect();
        let resolver = FallbackResolver::new(dir.path(), false)
            .unwrap()
            .with_overlay(Arc::new(overlay));

        assert_eq!(resolver.resolve(&get("/app")), rewrite("/app.html", Strategy::Extensionless));
        // Files on disk are still found when the overlay misses.
        assert_eq!(resolver.resolve(&get("/about")), rewrite("/about.html", Strategy::Extensionless));
    }

    #[test]
    fn test_rewrite_hook() {
        let dir = site();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let resolver = FallbackResolver::new(dir.path(), true)
            .unwrap()
            .on_rewrite(Arc::new(move |event: &RewriteEvent<'_>| {
                sink.lock()
                    .unwrap()
                    .push((event.from.to_string(), event.to.to_string(), event.strategy));
            }));

        resolver.resolve(&get("/about"));
        resolver.resolve(&get("/nowhere"));
        resolver.resolve(&RequestDescriptor::new(Method::DELETE, "/about"));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("/about".to_string(), "/about.html".to_string(), Strategy::Extensionless),
                ("/nowhere".to_string(), "/index.html".to_string(), Strategy::SpaFallback),
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_async() {
        let dir = site();
        let resolver = Arc::new(FallbackResolver::new(dir.path(), false).unwrap());
        assert_eq!(
            resolver.resolve_async(get("/blog/")).await,
            rewrite("/blog/index.html", Strategy::DirectoryIndex)
        );
        assert_eq!(
            resolver
                .resolve_async(RequestDescriptor::new(Method::PUT, "/blog/"))
                .await,
            Resolution::PassThrough
        );
    }
}
