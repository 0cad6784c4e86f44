/**
 * manifest module
 * Discovery and loading of per-project `project.json` descriptors
 */

pub mod discovery;
pub mod loader;

pub use discovery::discover_manifests;
pub use loader::load_manifest;

/// Fixed manifest filename, matched case-insensitively during discovery.
pub const MANIFEST_FILENAME: &str = "project.json";
