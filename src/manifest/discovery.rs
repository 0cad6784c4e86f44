// manifest/discovery.rs - Recursive manifest discovery
//
// Walks a root directory tree for `project.json` files at any depth,
// pruning vendor/build directories. Unreadable directories contribute
// zero manifests instead of aborting the scan; a missing root yields an
// empty result (a hub with no registered sub-projects is valid).

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::MANIFEST_FILENAME;

/// Directory names that are never descended into. These are build or
/// vendor trees, not candidate sub-projects, and may contain planted
/// manifest files.
const IGNORED_DIRS: &[&str] = &["node_modules", ".git", ".cursor", "dist", "build"];

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    // depth 0 is the scan root itself, which is never pruned by name.
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| IGNORED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Find every manifest file beneath `root`.
///
/// Returns absolute paths in traversal order; callers that need a stable
/// ordering sort the loaded records (see `project::registry`).
pub fn discover_manifests(root: &Path) -> Vec<PathBuf> {
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Per-directory read failures are recoverable: skip and
                // keep scanning siblings.
                debug!("Skipping unreadable entry during discovery: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let is_manifest = entry
            .file_name()
            .to_str()
            .map(|name| name.eq_ignore_ascii_case(MANIFEST_FILENAME))
            .unwrap_or(false);

        if is_manifest {
            manifests.push(entry.into_path());
        }
    }

    manifests
}
