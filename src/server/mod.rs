/**
 * server module
 * The hub HTTP server: listing API, health check, hub assets, and all
 * projects mounted under /p/<slug>
 */

pub mod mount;
pub mod response;
pub mod static_files;

pub use mount::{AppHandler, AppRegistry, MountContext, MountTable};
pub use response::HubResponse;
pub use static_files::StaticFiles;

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tiny_http::Method;
use tracing::{debug, error, info, warn};

use crate::config::HubConfig;
use crate::errors::{HubError, Result};
use crate::project::{build_registry, Project};

pub struct HubServer {
    config: HubConfig,
    table: MountTable,
    assets: Option<StaticFiles>,
}

impl HubServer {
    /// Wire up the server from a built registry. One-time startup step;
    /// a mount failure here means the process should not start.
    pub fn new(config: HubConfig, projects: &[Project], apps: &AppRegistry) -> Result<Self> {
        let table = MountTable::compose(projects, apps, &config.repo_root)?;

        let assets = if config.assets_dir.is_dir() {
            Some(StaticFiles::new(config.assets_dir.clone(), "index.html"))
        } else {
            debug!(
                "Hub assets directory {} not found, skipping",
                config.assets_dir.display()
            );
            None
        };

        Ok(Self {
            config,
            table,
            assets,
        })
    }

    pub fn mounted_projects(&self) -> usize {
        self.table.len()
    }

    /// Route one request. Pure with respect to the connection: callers
    /// convert the returned value at the socket boundary.
    pub fn handle(&self, method: &Method, raw_url: &str) -> HubResponse {
        let path = raw_url.split('?').next().unwrap_or(raw_url);

        if path == "/api/projects" {
            if *method != Method::Get {
                return HubResponse::method_not_allowed();
            }
            return self.list_projects();
        }

        if path == "/api/health" {
            if *method != Method::Get {
                return HubResponse::method_not_allowed();
            }
            let body = json!({
                "status": "ok",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            });
            return HubResponse::json(200, body.to_string());
        }

        if let Some(response) = self.table.dispatch(method, path) {
            return response;
        }

        match &self.assets {
            Some(assets) => assets.serve(method, path),
            None => HubResponse::not_found(),
        }
    }

    /// Listing endpoint. The registry is rebuilt fresh on every call, so
    /// manifest edits show up without a restart; a build failure is a 500
    /// with a diagnostic, never a partial list.
    fn list_projects(&self) -> HubResponse {
        match build_registry(&self.config.projects_dir) {
            Ok(projects) => {
                let summaries: Vec<_> = projects.iter().map(Project::summary).collect();
                let body = json!({ "projects": summaries });
                HubResponse::json(200, body.to_string())
            }
            Err(e) => {
                error!("Failed to load projects: {}", e);
                let body = json!({ "error": "Failed to load projects" });
                HubResponse::json(500, body.to_string())
            }
        }
    }

    /// Bind and serve until the shutdown flag is set.
    pub fn run(&self, shutdown: Arc<AtomicBool>) -> Result<()> {
        let addr = self.config.addr();
        let server = tiny_http::Server::http(&addr)
            .map_err(|e| HubError::Server(format!("failed to bind {}: {}", addr, e)))?;

        info!("Project hub listening on http://{}", addr);
        info!("{} project(s) mounted under /p/", self.table.len());

        self.serve_loop(&server, &shutdown);
        info!("Shutdown signal received, exiting");
        Ok(())
    }

    fn serve_loop(&self, server: &tiny_http::Server, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::SeqCst) {
            match server.recv_timeout(Duration::from_millis(500)) {
                Ok(Some(request)) => {
                    let method = request.method().clone();
                    let url = request.url().to_owned();

                    let response = self.handle(&method, &url);
                    debug!("{} {} -> {}", method, url, response.status());

                    if let Err(e) = request.respond(response.into_tiny()) {
                        warn!("Failed to send response for {}: {}", url, e);
                    }
                }
                Ok(None) => {
                    // Timeout, poll the shutdown flag again.
                }
                Err(e) => {
                    error!("Failed to receive request: {}", e);
                    break;
                }
            }
        }
    }
}

/// Starts a hub server on a random port in a background thread, for
/// integration tests. Dropping it stops the server.
pub struct TestServer {
    pub url: String,
    pub port: u16,
    shutdown: Arc<AtomicBool>,
    _handle: std::thread::JoinHandle<()>,
}

impl TestServer {
    pub fn start(hub: HubServer) -> Self {
        let server =
            tiny_http::Server::http("127.0.0.1:0").expect("failed to bind test HTTP server");
        let port = server
            .server_addr()
            .to_ip()
            .expect("not an IP addr")
            .port();
        let url = format!("http://127.0.0.1:{}", port);

        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = std::thread::spawn(move || hub.serve_loop(&server, &flag));

        Self {
            url,
            port,
            shutdown,
            _handle: handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
