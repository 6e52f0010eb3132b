use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::file::types::{map_io_error, to_slash_string, FileContent, LoadError, ReadError};
use crate::registry;
use crate::security::types::SecurityConfig;
use crate::security::validator::{normalize_slashes, resolve_lexical, PathValidator};

/// Loads one path end to end. Every step is a hard gate; the first failure
/// is the outcome for that path.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base: PathBuf,
    validator: PathValidator,
    max_file_size: u64,
}

impl FileLoader {
    /// `base` must already be canonical; `FileGate` takes care of that.
    pub fn new(base: PathBuf, config: &SecurityConfig) -> Result<Self, globset::Error> {
        let validator = PathValidator::new(base.clone(), config)?;
        Ok(Self {
            base,
            validator,
            max_file_size: config.max_file_size,
        })
    }

    pub async fn load(&self, path: &str) -> Result<FileContent, LoadError> {
        self.validator.validate(path).await?;

        let requested = Path::new(path);
        if registry::is_binary_extension(requested) {
            return Err(ReadError::ReadFailed {
                path: path.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    "binary file cannot be read as text",
                ),
            }
            .into());
        }

        let resolved = resolve_lexical(&self.base, Path::new(normalize_slashes(path).as_str()));
        let absolute = fs::canonicalize(&resolved)
            .await
            .map_err(|e| map_io_error(path, e))?;
        let metadata = fs::metadata(&absolute)
            .await
            .map_err(|e| map_io_error(path, e))?;
        if metadata.is_dir() {
            return Err(ReadError::IsDirectory {
                path: path.to_string(),
            }
            .into());
        }

        // Size is enforced from the stat result so oversized files are never
        // pulled into memory.
        let size = metadata.len();
        if size > self.max_file_size {
            return Err(crate::security::types::SecurityError::SizeExceeded {
                path: path.to_string(),
                size,
                limit: self.max_file_size,
            }
            .into());
        }

        let content = fs::read_to_string(&absolute)
            .await
            .map_err(|e| map_io_error(path, e))?;

        let language = registry::detect_language(requested).map(str::to_string);
        debug!(path, size, ?language, "loaded file");

        Ok(FileContent {
            path: normalize_slashes(path),
            absolute_path: to_slash_string(&absolute),
            content,
            size,
            language,
        })
    }
}
