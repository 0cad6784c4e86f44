// server/mount.rs - Mount composition
//
// Attaches every registry project to a dispatch table under its mount
// path, branching by project type. Embedded ("express") projects do not
// load arbitrary code: the manifest's resolved module path selects a
// handler factory the host registered up front, and a missing factory is
// a startup error, never a request-time one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tiny_http::Method;
use tracing::info;

use crate::errors::{HubError, Result};
use crate::project::{Project, ProjectKind};
use crate::server::response::HubResponse;
use crate::server::static_files::StaticFiles;

/// Mount-time context handed to an embedded app's factory.
#[derive(Debug, Clone)]
pub struct MountContext {
    /// The project's mount path (`/p/<slug>`), so the app can build
    /// absolute links while mounted under a prefix.
    pub base_path: String,
    /// Filesystem root of the whole hub, so the app can locate its own
    /// project directory independent of how it is mounted.
    pub repo_root: PathBuf,
}

/// The request-handling contract an embedded sub-application satisfies.
///
/// `path` is the sub-path below the mount point, always starting with '/'.
/// The app may route arbitrarily many inner paths off it.
pub trait AppHandler: Send + Sync {
    fn handle(&self, method: &Method, path: &str) -> HubResponse;
}

type HandlerFactory = Box<dyn Fn(&MountContext) -> Box<dyn AppHandler> + Send + Sync>;

/// Handler factories for embedded projects, keyed by the module path the
/// manifest resolves to. Registered by the embedding host before mounting.
#[derive(Default)]
pub struct AppRegistry {
    factories: HashMap<PathBuf, HandlerFactory>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, module: impl Into<PathBuf>, factory: F)
    where
        F: Fn(&MountContext) -> Box<dyn AppHandler> + Send + Sync + 'static,
    {
        self.factories.insert(module.into(), Box::new(factory));
    }

    fn create(&self, module: &Path, ctx: &MountContext) -> Result<Box<dyn AppHandler>> {
        let factory = self
            .factories
            .get(module)
            .ok_or_else(|| HubError::MountContract {
                module: module.to_path_buf(),
            })?;
        Ok(factory(ctx))
    }
}

enum MountKind {
    Static(StaticFiles),
    Redirect(String),
    Embedded(Box<dyn AppHandler>),
}

struct Mount {
    mount_path: String,
    kind: MountKind,
}

/// Dispatch table for everything mounted under `/p/`.
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    /// Compose the table from a built registry. One-shot startup wiring:
    /// any failure here should abort the host process.
    ///
    /// Mounting follows registry order (slug ascending). Since mount paths
    /// are `/p/<slug>` and the registry rejects duplicate slugs, no mount
    /// can shadow another.
    pub fn compose(projects: &[Project], apps: &AppRegistry, repo_root: &Path) -> Result<Self> {
        let mut mounts = Vec::with_capacity(projects.len());

        for project in projects {
            let kind = match &project.kind {
                ProjectKind::Static { dir, index } => {
                    MountKind::Static(StaticFiles::new(dir.clone(), index.clone()))
                }
                ProjectKind::Redirect { url } => MountKind::Redirect(url.clone()),
                ProjectKind::Embedded { module } => {
                    let ctx = MountContext {
                        base_path: project.mount_path.clone(),
                        repo_root: repo_root.to_path_buf(),
                    };
                    MountKind::Embedded(apps.create(module, &ctx)?)
                }
            };

            info!(
                "Mounted {} project \"{}\" at {}",
                project.kind.type_tag(),
                project.slug,
                project.mount_path
            );
            mounts.push(Mount {
                mount_path: project.mount_path.clone(),
                kind,
            });
        }

        Ok(Self { mounts })
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Route a request path to its mount. Returns None when no project
    /// owns the path.
    pub fn dispatch(&self, method: &Method, path: &str) -> Option<HubResponse> {
        for mount in &self.mounts {
            let Some(sub_path) = strip_mount_prefix(path, &mount.mount_path) else {
                continue;
            };

            let response = match &mount.kind {
                MountKind::Static(files) => files.serve(method, sub_path),
                // The entire subtree collapses to one external destination.
                MountKind::Redirect(url) => HubResponse::redirect(url),
                MountKind::Embedded(handler) => handler.handle(method, sub_path),
            };
            return Some(response);
        }
        None
    }
}

/// Match `path` against a mount path on segment boundaries: `/p/a` owns
/// `/p/a` and `/p/a/...` but not `/p/ab`.
fn strip_mount_prefix<'a>(path: &'a str, mount_path: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(mount_path)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{mount_path_for, DEFAULT_ICON};
    use std::fs;
    use tempfile::TempDir;

    fn project(slug: &str, kind: ProjectKind) -> Project {
        let mount_path = mount_path_for(slug);
        let href = match &kind {
            ProjectKind::Redirect { url } => url.clone(),
            _ => format!("{}/", mount_path),
        };
        Project {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            description: String::new(),
            tags: Vec::new(),
            icon: DEFAULT_ICON.to_string(),
            mount_path,
            href,
            kind,
            manifest_path: PathBuf::from(format!("/projects/{}/project.json", slug)),
        }
    }

    struct EchoApp {
        base_path: String,
    }

    impl AppHandler for EchoApp {
        fn handle(&self, _method: &Method, path: &str) -> HubResponse {
            HubResponse::text(200, format!("{} {}", self.base_path, path))
        }
    }

    #[test]
    fn test_strip_mount_prefix_matches_segment_boundaries() {
        assert_eq!(strip_mount_prefix("/p/a", "/p/a"), Some("/"));
        assert_eq!(strip_mount_prefix("/p/a/", "/p/a"), Some("/"));
        assert_eq!(strip_mount_prefix("/p/a/x/y", "/p/a"), Some("/x/y"));
        assert_eq!(strip_mount_prefix("/p/ab", "/p/a"), None);
        assert_eq!(strip_mount_prefix("/p/b", "/p/a"), None);
    }

    #[test]
    fn test_redirect_collapses_whole_subtree() {
        let projects = vec![project(
            "ext",
            ProjectKind::Redirect {
                url: "https://example.com".to_string(),
            },
        )];
        let table =
            MountTable::compose(&projects, &AppRegistry::new(), Path::new("/repo")).unwrap();

        for path in ["/p/ext", "/p/ext/", "/p/ext/deep/path?x=1", "/p/ext/a/b/c"] {
            let path = path.split('?').next().unwrap();
            let response = table.dispatch(&Method::Get, path).unwrap();
            assert_eq!(response.status(), 302);
            assert_eq!(response.header("Location"), Some("https://example.com"));
        }
    }

    #[test]
    fn test_static_mount_serves_its_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("home.html"), "hello").unwrap();

        let projects = vec![project(
            "site",
            ProjectKind::Static {
                dir: temp.path().to_path_buf(),
                index: "home.html".to_string(),
            },
        )];
        let table =
            MountTable::compose(&projects, &AppRegistry::new(), Path::new("/repo")).unwrap();

        let response = table.dispatch(&Method::Get, "/p/site/").unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn test_embedded_mount_receives_base_path_and_repo_root() {
        let module = PathBuf::from("/repo/Projects/app/hub-app");
        let projects = vec![project(
            "app",
            ProjectKind::Embedded {
                module: module.clone(),
            },
        )];

        let mut apps = AppRegistry::new();
        apps.register(module, |ctx: &MountContext| {
            assert_eq!(ctx.repo_root, Path::new("/repo"));
            Box::new(EchoApp {
                base_path: ctx.base_path.clone(),
            }) as Box<dyn AppHandler>
        });

        let table = MountTable::compose(&projects, &apps, Path::new("/repo")).unwrap();
        let response = table.dispatch(&Method::Get, "/p/app/inner/route").unwrap();
        assert_eq!(response.body(), b"/p/app /inner/route");
    }

    #[test]
    fn test_unregistered_module_is_a_mount_contract_error() {
        let module = PathBuf::from("/repo/Projects/ghost/hub-app");
        let projects = vec![project(
            "ghost",
            ProjectKind::Embedded {
                module: module.clone(),
            },
        )];

        match MountTable::compose(&projects, &AppRegistry::new(), Path::new("/repo")) {
            Err(HubError::MountContract { module: m }) => assert_eq!(m, module),
            Err(other) => panic!("expected mount contract error, got {:?}", other),
            Ok(_) => panic!("composing an unregistered module must fail"),
        }
    }

    #[test]
    fn test_dispatch_misses_outside_mounts() {
        let projects = vec![project(
            "only",
            ProjectKind::Redirect {
                url: "https://example.com".to_string(),
            },
        )];
        let table =
            MountTable::compose(&projects, &AppRegistry::new(), Path::new("/repo")).unwrap();

        assert!(table.dispatch(&Method::Get, "/p/other").is_none());
        assert!(table.dispatch(&Method::Get, "/api/projects").is_none());
        assert!(table.dispatch(&Method::Get, "/p/onlyx").is_none());
    }

    #[test]
    fn test_sibling_mounts_do_not_shadow() {
        let temp_a = TempDir::new().unwrap();
        let temp_b = TempDir::new().unwrap();
        fs::write(temp_a.path().join("index.html"), "a").unwrap();
        fs::write(temp_b.path().join("index.html"), "b").unwrap();

        let projects = vec![
            project(
                "a",
                ProjectKind::Static {
                    dir: temp_a.path().to_path_buf(),
                    index: "index.html".to_string(),
                },
            ),
            project(
                "ab",
                ProjectKind::Static {
                    dir: temp_b.path().to_path_buf(),
                    index: "index.html".to_string(),
                },
            ),
        ];
        let table =
            MountTable::compose(&projects, &AppRegistry::new(), Path::new("/repo")).unwrap();

        assert_eq!(table.dispatch(&Method::Get, "/p/a/").unwrap().body(), b"a");
        assert_eq!(table.dispatch(&Method::Get, "/p/ab/").unwrap().body(), b"b");
    }
}
