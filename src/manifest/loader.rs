// manifest/loader.rs - Manifest parsing and validation
//
// Converts one `project.json` into a normalized `Project`, or fails with
// an error naming the offending file. Loading is side-effect free: module
// paths for embedded projects are resolved but never executed here, so a
// listing API can enumerate every project without running sub-app code.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::{HubError, Result};
use crate::project::{mount_path_for, Project, ProjectKind, DEFAULT_ICON};

/// Raw, untrusted manifest shape. Every field optional at the serde level;
/// requiredness is enforced by `validate_and_normalize` so that missing
/// fields produce precise, file-attributed errors instead of serde's.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    slug: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    icon: Option<String>,
    // type == static
    static_dir: Option<String>,
    index: Option<String>,
    // type == redirect
    url: Option<String>,
    // type == express
    module: Option<String>,
}

/// Load and validate one manifest file.
pub fn load_manifest(manifest_path: &Path) -> Result<Project> {
    let contents = fs::read_to_string(manifest_path)?;
    parse_manifest(manifest_path, &contents)
}

/// Parse and validate manifest contents. Pure function of the contents and
/// the manifest's location.
pub fn parse_manifest(manifest_path: &Path, contents: &str) -> Result<Project> {
    let raw: RawManifest =
        serde_json::from_str(contents).map_err(|e| HubError::ManifestParse {
            path: manifest_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let manifest_dir = manifest_path.parent().unwrap_or(Path::new("."));
    validate_and_normalize(manifest_path, manifest_dir, raw)
}

fn required_field(
    manifest_path: &Path,
    name: &str,
    value: Option<String>,
) -> Result<String> {
    let trimmed = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(HubError::validation(
            manifest_path,
            format!("missing required field \"{}\"", name),
        ));
    }
    Ok(trimmed)
}

fn validate_and_normalize(
    manifest_path: &Path,
    manifest_dir: &Path,
    raw: RawManifest,
) -> Result<Project> {
    let slug = required_field(manifest_path, "slug", raw.slug)?;
    let title = required_field(manifest_path, "title", raw.title)?;
    let kind_tag = required_field(manifest_path, "type", raw.kind)?;

    let mount_path = mount_path_for(&slug);
    let description = raw
        .description
        .map(|d| d.trim().to_string())
        .unwrap_or_default();
    let tags = raw.tags.unwrap_or_default();
    let icon = raw.icon.unwrap_or_else(|| DEFAULT_ICON.to_string());

    let (kind, href) = match kind_tag.as_str() {
        "static" => {
            let static_dir = raw.static_dir.unwrap_or_else(|| ".".to_string());
            let index = raw.index.unwrap_or_else(|| "index.html".to_string());
            let kind = ProjectKind::Static {
                dir: manifest_dir.join(static_dir),
                index,
            };
            (kind, format!("{}/", mount_path))
        }
        "redirect" => {
            let url = required_field(manifest_path, "url", raw.url).map_err(|_| {
                HubError::validation(
                    manifest_path,
                    "missing required field \"url\" for redirect project",
                )
            })?;
            let href = url.clone();
            (ProjectKind::Redirect { url }, href)
        }
        "express" => {
            let module = required_field(manifest_path, "module", raw.module).map_err(|_| {
                HubError::validation(
                    manifest_path,
                    "missing required field \"module\" for express project",
                )
            })?;
            let kind = ProjectKind::Embedded {
                module: manifest_dir.join(module),
            };
            (kind, format!("{}/", mount_path))
        }
        other => {
            return Err(HubError::validation(
                manifest_path,
                format!("unsupported project type \"{}\"", other),
            ));
        }
    };

    Ok(Project {
        slug,
        title,
        description,
        tags,
        icon,
        mount_path,
        href,
        kind,
        manifest_path: manifest_path.to_path_buf(),
    })
}
