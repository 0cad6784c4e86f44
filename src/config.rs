//! Hub server configuration
//!
//! Plain value struct, filled in by the embedding host (the `hubd` CLI in
//! this repo). The library itself never reads environment variables.

use std::path::PathBuf;

/// Conventional projects directory name under the repo root.
pub const DEFAULT_PROJECTS_DIR: &str = "Projects";

/// Conventional hub asset directory (homepage, CSS, JS) under the repo root.
pub const DEFAULT_ASSETS_DIR: &str = "apps/hub/public";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct HubConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Filesystem root of the whole hub (passed to embedded apps).
    pub repo_root: PathBuf,
    /// Root scanned for project manifests.
    pub projects_dir: PathBuf,
    /// Hub's own static assets, served at `/`. Skipped when the directory
    /// does not exist.
    pub assets_dir: PathBuf,
}

impl HubConfig {
    /// Defaults mirroring the conventional hub layout under `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            projects_dir: repo_root.join(DEFAULT_PROJECTS_DIR),
            assets_dir: repo_root.join(DEFAULT_ASSETS_DIR),
            repo_root,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
