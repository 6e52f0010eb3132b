use std::path::{Path, PathBuf};

use tracing::debug;

use crate::file::types::{
    map_io_error, to_slash_string, BatchResult, DirectoryOptions, FileContent, LoadError,
};
use crate::file::{batch, loader::FileLoader, scanner};
use crate::security::types::SecurityConfig;
use crate::security::validator::{normalize_slashes, resolve_lexical, PathValidator};

/// High-level entry point for policy-checked file reads. Construct one per
/// call site or share it freely; every operation is a pure pipeline with no
/// state retained across calls.
#[derive(Debug, Clone)]
pub struct FileGate {
    base: PathBuf,
    config: SecurityConfig,
    validator: PathValidator,
    loader: FileLoader,
}

impl FileGate {
    /// Roots the gate at `base` (canonicalized here) under the given policy.
    /// Fails if the base cannot be resolved or a configured glob is invalid.
    pub fn new(base: impl Into<PathBuf>, config: SecurityConfig) -> Result<Self, LoadError> {
        let base = base.into();
        let base_str = to_slash_string(&base);
        let base = base
            .canonicalize()
            .map_err(|e| map_io_error(&base_str, e))?;
        let validator = PathValidator::new(base.clone(), &config)?;
        let loader = FileLoader::new(base.clone(), &config)?;
        Ok(Self {
            base,
            config,
            validator,
            loader,
        })
    }

    /// Convenience constructor rooted at the process working directory.
    pub fn current_dir(config: SecurityConfig) -> Result<Self, LoadError> {
        let cwd = std::env::current_dir().map_err(|e| map_io_error(".", e))?;
        Self::new(cwd, config)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Loads a single file, failing fast with exactly one typed error.
    pub async fn read_file(&self, path: &str) -> Result<FileContent, LoadError> {
        self.loader.load(path).await
    }

    /// Loads many files with per-item failure isolation; never fails as a
    /// whole. See `batch::load_many`.
    pub async fn read_files(&self, paths: Vec<String>) -> BatchResult {
        batch::load_many(&self.loader, paths).await
    }

    /// Scans `root` under the directory options, loads every surviving file,
    /// and returns contents with `path` relative to the requested root.
    /// Failures global to the operation (bad root, file-count ceiling)
    /// propagate; per-file failures become diagnostics.
    pub async fn read_directory(
        &self,
        root: &str,
        options: &DirectoryOptions,
    ) -> Result<BatchResult, LoadError> {
        self.validator.validate(root).await?;

        let resolved = resolve_lexical(&self.base, Path::new(normalize_slashes(root).as_str()));
        let max_files = options.max_files.unwrap_or(self.config.max_files);
        let relative = scanner::scan(&resolved, options, max_files)?;
        debug!(root, files = relative.len(), "directory scan complete");

        let prefix = format!("{}/", to_slash_string(&resolved));
        let absolute: Vec<String> = relative
            .iter()
            .map(|rel| format!("{prefix}{rel}"))
            .collect();

        let mut result = batch::load_many(&self.loader, absolute).await;
        for file in &mut result.files {
            if let Some(rel) = file.path.strip_prefix(&prefix) {
                file.path = rel.to_string();
            }
        }
        for diagnostic in &mut result.diagnostics {
            if let Some(rel) = diagnostic.path.strip_prefix(&prefix) {
                diagnostic.path = rel.to_string();
            }
        }
        Ok(result)
    }
}
