use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_max_file_size() -> u64 {
    1_048_576
}

fn default_max_files() -> u32 {
    500
}

/// Policy for the file-access gate. Immutable for the duration of a call.
///
/// `sensitive_patterns` are additional globs layered on top of the registry
/// defaults - the defaults are always consulted and can only be extended,
/// never dropped. The scalar fields replace their defaults outright.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SecurityConfig {
    /// Directories reads are confined to. Empty means unrestricted.
    #[serde(default)]
    pub allowed_directories: Vec<PathBuf>,

    /// Extra sensitive-file globs, merged additively with the defaults.
    #[serde(default)]
    pub sensitive_patterns: Vec<String>,

    /// Per-file size ceiling in bytes, enforced from stat before any read.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of files a directory scan may yield.
    #[serde(default = "default_max_files")]
    pub max_files: u32,

    /// Permit reads through symbolic links.
    #[serde(default)]
    pub allow_symlinks: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_directories: Vec::new(),
            sensitive_patterns: Vec::new(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            allow_symlinks: false,
        }
    }
}

/// Policy violations. Always evaluated before any content I/O, and always
/// distinguishable from environmental read failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("path traversal detected: {path}")]
    PathTraversal { path: String },

    #[error("access to sensitive file denied: {path}")]
    SensitiveFile { path: String },

    #[error("path is outside the allowed directories: {path}")]
    AccessDenied { path: String },

    #[error("symbolic links are not allowed: {path}")]
    SymlinkDetected { path: String },

    #[error("{path} is {size} bytes, exceeding the {limit} byte limit")]
    SizeExceeded { path: String, size: u64, limit: u64 },

    #[error("directory contains {count} files, exceeding the {limit} file limit")]
    FileLimitExceeded { count: usize, limit: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SecurityConfig::default();
        assert!(config.allowed_directories.is_empty());
        assert!(config.sensitive_patterns.is_empty());
        assert_eq!(config.max_file_size, 1_048_576);
        assert_eq!(config.max_files, 500);
        assert!(!config.allow_symlinks);
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: SecurityConfig =
            serde_json::from_str(r#"{"max_files": 10, "sensitive_patterns": ["**/*.conf"]}"#)
                .unwrap();
        assert_eq!(config.max_files, 10);
        assert_eq!(config.max_file_size, 1_048_576);
        assert_eq!(config.sensitive_patterns, vec!["**/*.conf".to_string()]);
    }
}
