// server/static_files.rs - Static directory handler
//
// Serves files below one directory, with a configurable default document
// for directory requests. Request paths are re-rooted component by
// component, so `..` (or any other attempt to step outside the directory)
// is rejected before touching the filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};
use tiny_http::Method;

use super::response::HubResponse;

pub struct StaticFiles {
    dir: PathBuf,
    index: String,
}

impl StaticFiles {
    pub fn new(dir: PathBuf, index: impl Into<String>) -> Self {
        Self {
            dir,
            index: index.into(),
        }
    }

    /// Serve `path` (the sub-path below the mount point, starting with '/').
    pub fn serve(&self, method: &Method, path: &str) -> HubResponse {
        if !matches!(method, Method::Get | Method::Head) {
            return HubResponse::method_not_allowed();
        }

        let Some(file_path) = self.resolve(path) else {
            return HubResponse::not_found();
        };

        match fs::read(&file_path) {
            Ok(body) => {
                let content_type = content_type_for(&file_path);
                if *method == Method::Head {
                    // HEAD omits the body but advertises the real length,
                    // so it agrees with what GET would return.
                    HubResponse::file(content_type, Vec::new())
                        .with_header("Content-Length", &body.len().to_string())
                } else {
                    HubResponse::file(content_type, body)
                }
            }
            Err(_) => HubResponse::not_found(),
        }
    }

    /// Map a request path to a file inside the static directory.
    ///
    /// Returns None when the path escapes the directory or names something
    /// that is not servable. Directory targets resolve to the index file.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.dir.clone();

        for segment in path.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            // Reject traversal and anything a path parser could reinterpret.
            if segment == ".." || segment.contains('\0') || segment.contains('\\') {
                return None;
            }
            match Path::new(segment).components().next() {
                Some(Component::Normal(_)) => resolved.push(segment),
                _ => return None,
            }
        }

        if resolved.is_dir() {
            resolved.push(&self.index);
        }

        Some(resolved)
    }
}

/// Content type from the file extension. Defaults to octet-stream.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, StaticFiles) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("home.html"), "<h1>home</h1>").unwrap();
        fs::write(temp.path().join("style.css"), "body{}").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/page.html"), "<p>sub</p>").unwrap();
        // A sibling outside the served directory, for traversal checks.
        fs::write(temp.path().join("sub/../secret.txt"), "secret").unwrap();

        let files = StaticFiles::new(temp.path().join("sub"), "page.html");
        (temp, files)
    }

    #[test]
    fn test_serves_files_with_content_type() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.js"), "console.log(1)").unwrap();
        let files = StaticFiles::new(temp.path().to_path_buf(), "index.html");

        let response = files.serve(&Method::Get, "/app.js");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.header("Content-Type"),
            Some("application/javascript; charset=utf-8")
        );
        assert_eq!(response.body(), b"console.log(1)");
    }

    #[test]
    fn test_directory_root_serves_index_document() {
        let (_temp, files) = fixture();

        let response = files.serve(&Method::Get, "/");
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), b"<p>sub</p>");
    }

    #[test]
    fn test_missing_file_is_404() {
        let (_temp, files) = fixture();
        assert_eq!(files.serve(&Method::Get, "/nope.html").status(), 404);
    }

    #[test]
    fn test_traversal_is_contained() {
        let (_temp, files) = fixture();

        assert_eq!(files.serve(&Method::Get, "/../secret.txt").status(), 404);
        assert_eq!(
            files.serve(&Method::Get, "/sub/../../secret.txt").status(),
            404
        );
        assert_eq!(files.serve(&Method::Get, "/..%2fsecret.txt").status(), 404);
    }

    #[test]
    fn test_head_matches_get_length_without_body() {
        let (_temp, files) = fixture();

        let get = files.serve(&Method::Get, "/page.html");
        let head = files.serve(&Method::Head, "/page.html");

        assert_eq!(head.status(), 200);
        assert!(head.body().is_empty());
        assert_eq!(
            head.header("Content-Length"),
            Some(get.body().len().to_string().as_str())
        );
    }

    #[test]
    fn test_non_get_is_rejected() {
        let (_temp, files) = fixture();
        assert_eq!(files.serve(&Method::Post, "/page.html").status(), 405);
    }

    #[test]
    fn test_content_type_fallback() {
        assert_eq!(
            content_type_for(Path::new("data.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("page.html")),
            "text/html; charset=utf-8"
        );
    }
}
