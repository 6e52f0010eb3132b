//! Process-wide pattern and extension tables.
//!
//! Everything here is immutable after first use: the default sensitive-file
//! globs, the default scan excludes, the binary-extension set, and the
//! extension-to-language map. The compiled glob sets are built once behind
//! `LazyLock` and shared by every call; there are no writers, so no locking.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Globs for files that commonly hold credentials or secrets. Matched
/// case-insensitively against both the full slash-normalized path and the
/// bare file name, so single-segment patterns catch files at any depth.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
    // Environment files
    "**/.env",
    "**/.env.*",
    "**/*.env",
    "**/.envrc",
    // Key material
    "**/*.pem",
    "**/*.key",
    "**/*.p12",
    "**/*.pfx",
    "**/*.jks",
    "**/id_rsa*",
    "**/id_dsa*",
    "**/id_ecdsa*",
    "**/id_ed25519*",
    "**/.ssh/**",
    // Credential- and secret-named files
    "**/*credential*",
    "**/*secret*",
    // VCS and registry auth
    "**/.git-credentials",
    "**/.netrc",
    "**/_netrc",
    "**/.npmrc",
    "**/.pypirc",
    // Local databases
    "**/*.sqlite",
    "**/*.sqlite3",
    "**/*.db",
    // Shell history
    "**/.*history",
    // Cloud provider credential directories
    "**/.aws/**",
    "**/.azure/**",
    "**/.kube/**",
    "**/.gcloud/**",
    "**/.config/gcloud/**",
    // Compose files frequently embed secrets inline
    "**/docker-compose*.yml",
    "**/docker-compose*.yaml",
    "**/compose.yml",
    "**/compose.yaml",
];

/// Directory names pruned during scans. Hidden (dot-prefixed) directories
/// are pruned unconditionally and do not need to appear here.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    "dist",
    "build",
    "out",
    "coverage",
    "__pycache__",
    "venv",
    "tmp",
    "temp",
    "logs",
];

/// File globs excluded from scans by default: lockfiles, generated
/// minified/bundled artifacts, source maps, logs, and OS litter.
pub const DEFAULT_EXCLUDED_GLOBS: &[&str] = &[
    "**/package-lock.json",
    "**/npm-shrinkwrap.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/Cargo.lock",
    "**/poetry.lock",
    "**/Gemfile.lock",
    "**/composer.lock",
    "**/*.min.js",
    "**/*.min.css",
    "**/*.bundle.js",
    "**/*.map",
    "**/*.log",
    "**/*.tmp",
    "**/.DS_Store",
    "**/Thumbs.db",
];

/// Extensions that are never loaded as text.
pub const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "psd",
    // Archives and packages
    "pdf", "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "jar", "war",
    // Executables and objects
    "exe", "dll", "so", "dylib", "bin", "o", "a", "obj", "lib",
    // Compiled bytecode
    "class", "pyc", "pyo", "wasm",
    // Fonts
    "woff", "woff2", "ttf", "eot", "otf",
    // Audio and video
    "mp3", "mp4", "m4a", "avi", "mov", "mkv", "wav", "flac", "ogg", "webm",
    // Databases
    "db", "sqlite", "sqlite3",
];

static LANGUAGES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("rs", "rust"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("py", "python"),
        ("rb", "ruby"),
        ("go", "go"),
        ("java", "java"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("hpp", "cpp"),
        ("cs", "csharp"),
        ("php", "php"),
        ("swift", "swift"),
        ("kt", "kotlin"),
        ("kts", "kotlin"),
        ("scala", "scala"),
        ("sh", "shell"),
        ("bash", "shell"),
        ("zsh", "shell"),
        ("fish", "fish"),
        ("ps1", "powershell"),
        ("sql", "sql"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("less", "less"),
        ("json", "json"),
        ("jsonc", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("toml", "toml"),
        ("xml", "xml"),
        ("md", "markdown"),
        ("markdown", "markdown"),
        ("vue", "vue"),
        ("svelte", "svelte"),
        ("dart", "dart"),
        ("lua", "lua"),
        ("r", "r"),
        ("pl", "perl"),
        ("pm", "perl"),
        ("ex", "elixir"),
        ("exs", "elixir"),
        ("erl", "erlang"),
        ("hs", "haskell"),
        ("clj", "clojure"),
        ("cljs", "clojure"),
        ("zig", "zig"),
        ("proto", "protobuf"),
        ("graphql", "graphql"),
        ("gql", "graphql"),
        ("tf", "terraform"),
        ("ini", "ini"),
        ("cfg", "ini"),
        ("conf", "ini"),
    ])
});

static SENSITIVE_MATCHER: LazyLock<GlobSet> = LazyLock::new(|| {
    build_matcher(DEFAULT_SENSITIVE_PATTERNS.iter().copied())
        .expect("default sensitive patterns are valid globs")
});

static DEFAULT_EXCLUDE_MATCHER: LazyLock<GlobSet> = LazyLock::new(|| {
    build_matcher(DEFAULT_EXCLUDED_GLOBS.iter().copied())
        .expect("default exclude patterns are valid globs")
});

/// The compiled default sensitive-file matcher.
pub fn sensitive_matcher() -> &'static GlobSet {
    &SENSITIVE_MATCHER
}

/// The compiled default scan-exclude matcher.
pub fn default_exclude_matcher() -> &'static GlobSet {
    &DEFAULT_EXCLUDE_MATCHER
}

/// Compile a list of glob patterns into a matcher. Matching is
/// case-insensitive and `*` never crosses a path separator; a leading `**/`
/// matches zero or more leading components.
pub fn build_matcher<I, S>(patterns: I) -> Result<GlobSet, globset::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern.as_ref())
            .case_insensitive(true)
            .literal_separator(true)
            .build()?;
        builder.add(glob);
    }
    builder.build()
}

/// Whether the path's extension marks it as binary content.
pub fn is_binary_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    BINARY_EXTENSIONS.contains(&ext.as_str())
}

/// Best-effort language detection from the file name. Special-cased
/// basenames are checked first (case-insensitively), then the extension
/// table. No mapping is not an error.
pub fn detect_language(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    let special = match name.to_ascii_lowercase().as_str() {
        "dockerfile" => Some("dockerfile"),
        "makefile" | "gnumakefile" => Some("makefile"),
        ".gitignore" => Some("gitignore"),
        ".dockerignore" => Some("dockerignore"),
        ".editorconfig" => Some("editorconfig"),
        _ => None,
    };
    if special.is_some() {
        return special;
    }

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    LANGUAGES.get(ext.as_str()).copied()
}
