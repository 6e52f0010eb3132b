//! Path validation: pure predicates plus one I/O-backed symlink check.
//!
//! The predicates (traversal, sensitivity, allow-list containment) touch no
//! filesystem state and can be property-tested in isolation; `validate`
//! composes them with the symlink check in a fixed, fail-fast order.

use std::path::{Component, Path, PathBuf};

use globset::GlobSet;
use tokio::fs;

use crate::registry;
use crate::security::types::{SecurityConfig, SecurityError};

/// Decides whether a path may be read under a given policy.
///
/// `base` is the directory relative paths resolve against and the boundary
/// the traversal check enforces; callers normally pass the process working
/// directory or a canonicalized workspace root.
#[derive(Debug, Clone)]
pub struct PathValidator {
    base: PathBuf,
    allowed: Vec<PathBuf>,
    extra_sensitive: Option<GlobSet>,
    allow_symlinks: bool,
}

impl PathValidator {
    /// Compiles the caller's extra sensitive patterns once. Fails only on an
    /// invalid glob.
    pub fn new(base: impl Into<PathBuf>, config: &SecurityConfig) -> Result<Self, globset::Error> {
        let base = base.into();
        let allowed = config
            .allowed_directories
            .iter()
            .map(|dir| resolve_lexical(&base, dir))
            .collect();
        let extra_sensitive = if config.sensitive_patterns.is_empty() {
            None
        } else {
            Some(registry::build_matcher(&config.sensitive_patterns)?)
        };
        Ok(Self {
            base,
            allowed,
            extra_sensitive,
            allow_symlinks: config.allow_symlinks,
        })
    }

    /// Runs every check in fixed priority order; the first violation wins.
    pub async fn validate(&self, path: &str) -> Result<(), SecurityError> {
        if has_traversal(path, &self.base) {
            return Err(SecurityError::PathTraversal {
                path: path.to_string(),
            });
        }
        if self.is_sensitive(path) {
            return Err(SecurityError::SensitiveFile {
                path: path.to_string(),
            });
        }
        if !self.is_within_allowed(path) {
            return Err(SecurityError::AccessDenied {
                path: path.to_string(),
            });
        }
        if !self.allow_symlinks {
            self.reject_symlink(path).await?;
        }
        Ok(())
    }

    /// Glob-matches the slash-normalized path and its bare file name against
    /// the registry defaults plus any configured extras. Case-insensitive.
    pub fn is_sensitive(&self, path: &str) -> bool {
        let normalized = normalize_slashes(path);
        let full = Path::new(normalized.as_str());
        let name = full.file_name().map(Path::new);

        let matches = |set: &GlobSet| {
            set.is_match(full) || name.map_or(false, |name| set.is_match(name))
        };

        if matches(registry::sensitive_matcher()) {
            return true;
        }
        self.extra_sensitive.as_ref().map_or(false, matches)
    }

    /// Containment check against the allow-list. Component-wise, never a
    /// string prefix: `/var/www-secret` is not inside `/var/www`. An empty
    /// allow-list admits everything.
    pub fn is_within_allowed(&self, path: &str) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        let normalized = normalize_slashes(path);
        let target = resolve_lexical(&self.base, Path::new(normalized.as_str()));
        self.allowed
            .iter()
            .any(|dir| target.strip_prefix(dir).is_ok())
    }

    /// The one I/O-backed check. A path that does not exist is not a
    /// violation here; the subsequent read reports it as not-found.
    async fn reject_symlink(&self, path: &str) -> Result<(), SecurityError> {
        let target = resolve_lexical(&self.base, Path::new(path));
        match fs::symlink_metadata(&target).await {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                Err(SecurityError::SymlinkDetected {
                    path: path.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Traversal detection. Rejects any raw `..` segment (split on either
/// separator style), then lexically resolves against `base` and rejects
/// paths that escape it. A substring check is deliberately not used so that
/// names like `vendor..lib.js` pass.
pub fn has_traversal(path: &str, base: &Path) -> bool {
    let normalized = normalize_slashes(path);
    if normalized.split('/').any(|segment| segment == "..") {
        return true;
    }
    let resolved = resolve_lexical(base, Path::new(normalized.as_str()));
    resolved.strip_prefix(base).is_err()
}

/// Input paths are normalized to forward slashes before matching, so
/// Windows-style input behaves the same on every host.
pub(crate) fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve `path` against `base` without touching the filesystem: absolute
/// paths stand alone, relative paths are joined, and `.`/`..` components are
/// folded out.
pub(crate) fn resolve_lexical(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    fn validator(config: &SecurityConfig) -> PathValidator {
        PathValidator::new("/workspace", config).unwrap()
    }

    #[rstest]
    #[case("../../etc/passwd", true)]
    #[case("..", true)]
    #[case("a/../b.txt", true)]
    #[case("..\\windows\\system32", true)]
    #[case("/etc/passwd", true)]
    #[case("./vendor..lib.js", false)]
    #[case("src/main.rs", false)]
    #[case("/workspace/src/main.rs", false)]
    #[case("file..name.txt", false)]
    fn traversal_detection(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(has_traversal(path, Path::new("/workspace")), expected);
    }

    #[rstest]
    #[case(".env", true)]
    #[case("config/.env.local", true)]
    #[case("SERVER.PEM", true)]
    #[case("home/user/.ssh/id_rsa", true)]
    #[case("config/credentials.json", true)]
    #[case("deploy/secrets.yaml", true)]
    #[case(".bash_history", true)]
    #[case("docker-compose.prod.yml", true)]
    #[case("src/index.ts", false)]
    #[case("notes.md", false)]
    #[case("src/environment.rs", false)]
    fn sensitive_detection(#[case] path: &str, #[case] expected: bool) {
        let v = validator(&SecurityConfig::default());
        assert_eq!(v.is_sensitive(path), expected, "{path}");
    }

    #[test]
    fn extra_sensitive_patterns_are_additive() {
        let config = SecurityConfig {
            sensitive_patterns: vec!["**/*.conf".to_string()],
            ..Default::default()
        };
        let v = validator(&config);
        assert!(v.is_sensitive("app.conf"));
        // Defaults are never dropped.
        assert!(v.is_sensitive(".env"));
        assert!(!v.is_sensitive("src/index.ts"));
    }

    #[test]
    fn containment_is_not_prefix_confusable() {
        let config = SecurityConfig {
            allowed_directories: vec![PathBuf::from("/var/www")],
            ..Default::default()
        };
        let v = validator(&config);
        assert!(!v.is_within_allowed("/var/www-secret/x"));
        assert!(v.is_within_allowed("/var/www/x"));
    }

    #[test]
    fn empty_allow_list_admits_everything() {
        let v = validator(&SecurityConfig::default());
        assert!(v.is_within_allowed("/anywhere/at/all"));
    }

    #[test]
    fn relative_paths_are_contained_via_base() {
        let config = SecurityConfig {
            allowed_directories: vec![PathBuf::from("/workspace/src")],
            ..Default::default()
        };
        let v = validator(&config);
        assert!(v.is_within_allowed("src/main.rs"));
        assert!(!v.is_within_allowed("docs/readme.md"));
    }

    #[tokio::test]
    async fn traversal_wins_over_sensitivity() {
        let v = validator(&SecurityConfig::default());
        let err = v.validate("../.env").await.unwrap_err();
        assert_eq!(
            err,
            SecurityError::PathTraversal {
                path: "../.env".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_path_is_not_a_symlink_violation() {
        let temp = tempdir().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let v = PathValidator::new(base, &SecurityConfig::default()).unwrap();
        assert!(v.validate("ghost.txt").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_rejected_unless_allowed() {
        let temp = tempdir().unwrap();
        let base = temp.path().canonicalize().unwrap();
        std::fs::write(base.join("real.txt"), "content").unwrap();
        std::os::unix::fs::symlink(base.join("real.txt"), base.join("link.txt")).unwrap();

        let v = PathValidator::new(base.clone(), &SecurityConfig::default()).unwrap();
        let err = v.validate("link.txt").await.unwrap_err();
        assert_eq!(
            err,
            SecurityError::SymlinkDetected {
                path: "link.txt".to_string()
            }
        );

        let permissive = SecurityConfig {
            allow_symlinks: true,
            ..Default::default()
        };
        let v = PathValidator::new(base, &permissive).unwrap();
        assert!(v.validate("link.txt").await.is_ok());
    }
}
