use std::path::Path;

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::file::types::{map_io_error, to_slash_string, DirectoryOptions, LoadError, ReadError};
use crate::registry;
use crate::security::types::SecurityError;

/// Enumerates the files under `root` that survive the include/exclude
/// filters, as root-relative forward-slash paths in deterministic name
/// order. No file content is read; the count ceiling is enforced on the
/// enumeration alone, so a hostile or oversized tree costs zero reads.
pub fn scan(
    root: &Path,
    options: &DirectoryOptions,
    max_files: u32,
) -> Result<Vec<String>, LoadError> {
    let root_str = to_slash_string(root);
    let metadata = std::fs::metadata(root).map_err(|e| map_io_error(&root_str, e))?;
    if !metadata.is_dir() {
        return Err(ReadError::NotADirectory { path: root_str }.into());
    }

    let include = match options.include.is_empty() {
        true => None,
        false => Some(registry::build_matcher(&options.include)?),
    };
    let exclude = match options.exclude.is_empty() {
        true => None,
        false => Some(registry::build_matcher(&options.exclude)?),
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    for result in walker.filter_entry(keep_entry) {
        let entry = match result {
            Ok(entry) => entry,
            Err(error) => {
                warn!(?error, "failed to read directory entry during scan");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_str = to_slash_string(relative);
        let relative_path = Path::new(relative_str.as_str());

        if registry::default_exclude_matcher().is_match(relative_path) {
            continue;
        }
        if let Some(exclude) = &exclude {
            if exclude.is_match(relative_path) {
                continue;
            }
        }
        if registry::is_binary_extension(relative_path) {
            continue;
        }
        if let Some(include) = &include {
            if !include.is_match(relative_path) {
                continue;
            }
        }
        files.push(relative_str);
    }

    if files.len() > max_files as usize {
        return Err(SecurityError::FileLimitExceeded {
            count: files.len(),
            limit: max_files,
        }
        .into());
    }
    Ok(files)
}

/// Traversal filter: hidden entries and symlinks are never descended into,
/// independent of the include patterns, and registry-default directories
/// (dependency dirs, build outputs) are pruned wholesale.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    if entry.path_is_symlink() {
        return false;
    }
    if entry.file_type().is_dir() && registry::DEFAULT_EXCLUDED_DIRS.contains(&name.as_ref()) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    fn options(include: &[&str], exclude: &[&str]) -> DirectoryOptions {
        DirectoryOptions {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            max_files: None,
        }
    }

    #[test]
    fn include_filter_and_default_excludes_compose() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("a.ts"), "let a;").unwrap();
        std_fs::write(temp.path().join("b.js"), "let b;").unwrap();
        std_fs::create_dir(temp.path().join("node_modules")).unwrap();
        std_fs::write(temp.path().join("node_modules/c.ts"), "let c;").unwrap();

        let files = scan(temp.path(), &options(&["**/*.ts"], &[]), 500).unwrap();
        assert_eq!(files, vec!["a.ts".to_string()]);
    }

    #[test]
    fn file_limit_fails_the_whole_scan() {
        let temp = tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            std_fs::write(temp.path().join(name), "x").unwrap();
        }

        let err = scan(temp.path(), &DirectoryOptions::default(), 2).unwrap_err();
        match err {
            LoadError::Security(SecurityError::FileLimitExceeded { count, limit }) => {
                assert_eq!(count, 3);
                assert_eq!(limit, 2);
            }
            other => panic!("expected FileLimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn hidden_entries_are_never_traversed() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("visible.txt"), "x").unwrap();
        std_fs::write(temp.path().join(".hidden.txt"), "x").unwrap();
        std_fs::create_dir(temp.path().join(".git")).unwrap();
        std_fs::write(temp.path().join(".git/config"), "x").unwrap();

        let files = scan(temp.path(), &DirectoryOptions::default(), 500).unwrap();
        assert_eq!(files, vec!["visible.txt".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_never_traversed() {
        let temp = tempdir().unwrap();
        std_fs::create_dir(temp.path().join("real")).unwrap();
        std_fs::write(temp.path().join("real/a.txt"), "x").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("real/a.txt"),
            temp.path().join("b.txt"),
        )
        .unwrap();

        let files = scan(temp.path(), &DirectoryOptions::default(), 500).unwrap();
        assert_eq!(files, vec!["real/a.txt".to_string()]);
    }

    #[test]
    fn binary_extensions_and_lockfiles_are_stripped() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("logo.png"), [0u8; 4]).unwrap();
        std_fs::write(temp.path().join("package-lock.json"), "{}").unwrap();
        std_fs::write(temp.path().join("app.min.js"), "x").unwrap();
        std_fs::write(temp.path().join("index.js"), "x").unwrap();

        let files = scan(temp.path(), &DirectoryOptions::default(), 500).unwrap();
        assert_eq!(files, vec!["index.js".to_string()]);
    }

    #[test]
    fn caller_excludes_are_merged_with_defaults() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("readme.md"), "x").unwrap();
        std_fs::write(temp.path().join("main.rs"), "x").unwrap();
        std_fs::write(temp.path().join("yarn.lock"), "x").unwrap();

        let files = scan(temp.path(), &options(&[], &["**/*.md"]), 500).unwrap();
        assert_eq!(files, vec!["main.rs".to_string()]);
    }

    #[test]
    fn results_use_forward_slashes() {
        let temp = tempdir().unwrap();
        std_fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        std_fs::write(temp.path().join("src/nested/deep.rs"), "x").unwrap();

        let files = scan(temp.path(), &DirectoryOptions::default(), 500).unwrap();
        assert_eq!(files, vec!["src/nested/deep.rs".to_string()]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let temp = tempdir().unwrap();
        let err = scan(
            &temp.path().join("absent"),
            &DirectoryOptions::default(),
            500,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Read(ReadError::NotFound { .. })));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let temp = tempdir().unwrap();
        std_fs::write(temp.path().join("file.txt"), "x").unwrap();
        let err = scan(
            &temp.path().join("file.txt"),
            &DirectoryOptions::default(),
            500,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Read(ReadError::NotADirectory { .. })
        ));
    }
}
