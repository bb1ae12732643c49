//! Shared utilities for integration testing.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use fallback_devserver::config::{AppType, DevServerConfig};
use fallback_devserver::environment::ClientEnvironment;
use fallback_devserver::lifecycle::Shutdown;
use fallback_devserver::DevServer;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A small multi-page site:
///
/// ```text
/// index.html          "home"
/// about.html          "about"
/// blog/index.html     "blog"
/// assets/app.js       "app"
/// ```
pub fn fixture_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.html", "home");
    write(dir.path(), "about.html", "about");
    write(dir.path(), "blog/index.html", "blog");
    write(dir.path(), "assets/app.js", "app");
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Start a dev server on an ephemeral loopback port.
pub async fn start_server(
    root: &Path,
    app_type: AppType,
    environment: ClientEnvironment,
) -> (SocketAddr, Shutdown) {
    let mut config = DevServerConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.fallback.root = root.to_path_buf();
    config.fallback.app_type = app_type;

    let server = DevServer::new(config, environment).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
