//! Error types for the project hub

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Invalid JSON in {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("Invalid manifest {path}: {reason}")]
    ManifestValidation { path: PathBuf, reason: String },

    #[error("Duplicate slug \"{slug}\" in {path}")]
    DuplicateSlug { slug: String, path: PathBuf },

    #[error("Embedded project module has no registered handler factory: {module}")]
    MountContract { module: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl HubError {
    pub(crate) fn validation(path: &std::path::Path, reason: impl Into<String>) -> Self {
        HubError::ManifestValidation {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
