use std::io;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::security::types::SecurityError;

/// One successfully loaded text file.
///
/// `absolute_path` is always the canonicalized resolution of the input with
/// forward-slash separators, on every platform. `path` is relative to
/// whatever the caller queried with: the input itself for single loads, the
/// scanned root for directory loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub absolute_path: String,
    pub content: String,
    pub size: u64,
    pub language: Option<String>,
}

/// Recorded when a batch load skips a file. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadDiagnostic {
    pub path: String,
    pub message: String,
}

/// The outcome of a batch or directory load. The call itself never fails for
/// an individual bad file; callers inspect `diagnostics` for partial failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub files: Vec<FileContent>,
    pub diagnostics: Vec<ReadDiagnostic>,
}

/// Options for directory reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryOptions {
    /// Include globs; empty means everything (`**/*`).
    #[serde(default)]
    pub include: Vec<String>,

    /// Exclude globs, merged with the registry defaults.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Overrides the configured file-count ceiling for this read.
    #[serde(default)]
    pub max_files: Option<u32>,
}

/// Environmental filesystem failures, distinct from policy violations.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("permission denied: {path}")]
    AccessDenied { path: String },

    #[error("path is a directory, not a file: {path}")]
    IsDirectory { path: String },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Everything a load operation can fail with: a policy violation, a
/// filesystem failure, or an invalid caller-supplied glob.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
}

pub(crate) fn map_io_error(path: &str, error: io::Error) -> ReadError {
    match error.kind() {
        io::ErrorKind::NotFound => ReadError::NotFound {
            path: path.to_string(),
        },
        io::ErrorKind::PermissionDenied => ReadError::AccessDenied {
            path: path.to_string(),
        },
        _ => ReadError::ReadFailed {
            path: path.to_string(),
            source: error,
        },
    }
}

/// Renders a real path with forward slashes regardless of host conventions.
pub(crate) fn to_slash_string(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
