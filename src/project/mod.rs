/**
 * project module
 * Normalized project records and the registry builder
 */

pub mod registry;

pub use registry::build_registry;

use serde::Serialize;
use std::path::PathBuf;

/// Reserved URL namespace every project is mounted under.
///
/// Mount paths are always computed as `/p/<slug>` and never read from the
/// manifest, so a manifest cannot mount itself outside this namespace.
pub const MOUNT_PREFIX: &str = "/p";

/// Icon identifier used when the manifest does not set one.
pub const DEFAULT_ICON: &str = "fa-folder";

/// Compute the mount path for a slug.
pub fn mount_path_for(slug: &str) -> String {
    format!("{}/{}", MOUNT_PREFIX, slug)
}

/// Type-specific payload of a project. Exactly one shape per project,
/// matching the manifest's `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectKind {
    /// Serve files from a directory, with a default index document.
    Static { dir: PathBuf, index: String },
    /// Redirect the whole subtree to an external URL.
    Redirect { url: String },
    /// An embedded sub-application, selected by its resolved module path
    /// from the handler factories the host registered.
    Embedded { module: PathBuf },
}

impl ProjectKind {
    /// The manifest `type` tag for this payload ("express" is kept as the
    /// on-disk tag for embedded apps, for compatibility with existing
    /// manifests).
    pub fn type_tag(&self) -> &'static str {
        match self {
            ProjectKind::Static { .. } => "static",
            ProjectKind::Redirect { .. } => "redirect",
            ProjectKind::Embedded { .. } => "express",
        }
    }
}

/// A validated, normalized project record. Read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub icon: String,
    /// Always `/p/<slug>`.
    pub mount_path: String,
    /// Externally visible link: `mount_path + "/"` for static/embedded
    /// projects, the raw target URL for redirects.
    pub href: String,
    pub kind: ProjectKind,
    /// Manifest file this record was loaded from (error attribution).
    pub manifest_path: PathBuf,
}

impl Project {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            icon: self.icon.clone(),
            kind: self.kind.type_tag().to_string(),
            href: self.href.clone(),
        }
    }
}

/// Host-facing listing record. Internal fields (mount path, resolved
/// filesystem paths, module references) are deliberately not exposed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub href: String,
}
