// project/registry.rs - Registry builder
//
// Discovery + loading over a projects root, producing the full ordered
// collection of normalized projects. Any single bad manifest fails the
// whole build: the registry is small and operator-controlled, so a broken
// descriptor is a configuration bug to fix, not something to hide from
// the listing. This is deliberately stricter than discovery's per-
// directory leniency.

use std::path::Path;
use tracing::debug;

use crate::errors::{HubError, Result};
use crate::manifest::{discover_manifests, load_manifest};
use crate::project::Project;

/// Build the registry for a projects root directory.
///
/// Each call re-discovers and re-parses every manifest, so the result is
/// always a fresh, fully consistent snapshot. The returned collection is
/// sorted ascending by slug (code-point order), independent of filesystem
/// iteration order, and duplicate slugs are a fatal error.
pub fn build_registry(projects_root: &Path) -> Result<Vec<Project>> {
    let manifests = discover_manifests(projects_root);
    debug!(
        "Discovered {} manifest(s) under {}",
        manifests.len(),
        projects_root.display()
    );

    let mut projects = Vec::with_capacity(manifests.len());
    for manifest_path in manifests {
        projects.push(load_manifest(&manifest_path)?);
    }

    projects.sort_by(|a, b| a.slug.cmp(&b.slug));

    // Duplicate slugs would silently shadow each other at mount time.
    for pair in projects.windows(2) {
        if pair[0].slug == pair[1].slug {
            return Err(HubError::DuplicateSlug {
                slug: pair[1].slug.clone(),
                path: pair[1].manifest_path.clone(),
            });
        }
    }

    Ok(projects)
}
