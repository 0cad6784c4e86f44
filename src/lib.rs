//! # Project Hub
//!
//! A personal hub server that discovers small, unrelated sub-projects on
//! disk and mounts them under one HTTP origin.
//!
//! ## Core Principle
//!
//! **The manifest IS the registration**: dropping a directory with a
//! `project.json` under the projects root is all it takes to publish a
//! sub-project. No central configuration file lists them.
//!
//! ## Architecture
//!
//! ```text
//! Projects/               discovery        registry          mounting
//! ├── budget/project.json ──────────┐
//! ├── design/project.json ──────────┼──> [alpha, beta, ...] ──> /p/<slug>/...
//! └── tools/project.json  ──────────┘     (slug-sorted,          static |
//!                                          fail-fast)            redirect |
//!                                                                embedded app
//! ```
//!
//! The pipeline is linear and synchronous: discover manifests, load and
//! validate each one, sort by slug, mount. Every stage produces a fresh
//! value; a registry build either fully succeeds or fails with an error
//! naming the offending manifest file.

pub mod config;
pub mod errors;
pub mod manifest;
pub mod project;
pub mod server;

pub use config::HubConfig;
pub use errors::HubError;
pub use manifest::{discover_manifests, load_manifest, MANIFEST_FILENAME};
pub use project::{build_registry, Project, ProjectKind, ProjectSummary, MOUNT_PREFIX};
pub use server::{AppHandler, AppRegistry, HubResponse, HubServer, MountContext, TestServer};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
