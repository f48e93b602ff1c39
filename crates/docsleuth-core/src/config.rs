/// Loader configuration and documents-root resolution.
///
/// The root directory is always passed in explicitly. Nothing in the core
/// reads environment variables; the binary decides where a requested root
/// comes from (argument, `DOCS_DIR`) and hands it to
/// [`resolve_docs_root`].
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Directory names skipped during discovery unless `show_ignored` is set.
///
/// Dependency caches and build output that often hold thousands of files
/// but rarely any documentation worth browsing.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    "target",
    ".cache",
    ".next",
    ".nuxt",
    "coverage",
    ".terraform",
    ".serverless",
    "bower_components",
];

/// Extensions treated as documents, compared case-insensitively.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Name of the conventional documentation folder looked for under the
/// working directory when no root is requested.
pub const DEFAULT_DOCS_DIR: &str = "docs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Absolute directory to index.
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub ignored_dirs: Vec<String>,
    /// Include files and directories whose name starts with `.`.
    pub show_hidden: bool,
    /// Descend into `ignored_dirs` anyway.
    pub show_ignored: bool,
}

impl LoaderConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            show_hidden: false,
            show_ignored: false,
        }
    }

    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn with_show_ignored(mut self, show_ignored: bool) -> Self {
        self.show_ignored = show_ignored;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a file name carries one of the configured extensions.
    pub fn is_document(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }

    /// Whether discovery should prune a directory with this name.
    pub fn is_ignored_dir(&self, dir_name: &str) -> bool {
        !self.show_ignored && self.ignored_dirs.iter().any(|d| d == dir_name)
    }
}

/// Pick the directory to index.
///
/// - A requested path is made absolute against `cwd` and must be an
///   existing directory.
/// - Otherwise `<cwd>/docs` is used when it is a directory.
/// - Otherwise `cwd` itself.
pub fn resolve_docs_root(requested: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(requested) = requested {
        let absolute = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            cwd.join(requested)
        };
        return match std::fs::metadata(&absolute) {
            Ok(meta) if meta.is_dir() => Ok(absolute),
            Ok(_) => Err(ConfigError::NotADirectory(absolute)),
            Err(_) => Err(ConfigError::NotFound(absolute)),
        };
    }

    let docs = cwd.join(DEFAULT_DOCS_DIR);
    if docs.is_dir() {
        Ok(docs)
    } else {
        Ok(cwd.to_path_buf())
    }
}

/// [`resolve_docs_root`] against the process working directory.
pub fn resolve_docs_root_from_cwd(requested: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    resolve_docs_root(requested, &cwd)
}
