/// Document discovery and parsing.
///
/// Discovery uses `jwalk`'s rayon-backed parallel traversal with pruning
/// done inside `process_read_dir`, so ignored and hidden directories are
/// never descended into. Reading and front-matter parsing then fan out
/// over rayon; every file is independent, and the results are collected
/// and sorted once at the end.
use super::frontmatter::{document_title, parse_document};
use super::{SkipReason, SkippedEntry};
use crate::config::LoaderConfig;
use crate::model::{compare_names, DocumentRecord};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Walk `config.root` and return the candidate document paths, plus any
/// entries the walk itself could not read.
pub(crate) fn discover(config: &LoaderConfig) -> (Vec<PathBuf>, Vec<SkippedEntry>) {
    let prune = config.clone();
    let walker = jwalk::WalkDir::new(&config.root)
        .skip_hidden(!config.show_hidden)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry| match entry {
                Ok(e) if e.file_type().is_dir() => {
                    !prune.is_ignored_dir(&e.file_name().to_string_lossy())
                }
                _ => true,
            });
        });

    let mut paths = Vec::new();
    let mut skipped = Vec::new();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                warn!("Skipping unreadable entry {}: {err}", path.display());
                skipped.push(SkippedEntry {
                    path,
                    reason: SkipReason::Walk(err.to_string()),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        if !(file_type.is_file() || file_type.is_symlink()) {
            continue;
        }
        if !config.is_document(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        if file_type.is_symlink() {
            // Links are not followed during the walk; a linked document is
            // indexed under the link's own path when its target is a file.
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(err) => {
                    warn!("Skipping broken link {}: {err}", path.display());
                    skipped.push(SkippedEntry {
                        path,
                        reason: SkipReason::Io(err.to_string()),
                    });
                    continue;
                }
            }
        }
        paths.push(path);
    }

    debug!(
        "Discovered {} candidate documents under {}",
        paths.len(),
        config.root.display()
    );
    (paths, skipped)
}

/// Read and parse every discovered path in parallel.
///
/// Returns records sorted by relative path, and the files that could not
/// be indexed.
pub(crate) fn read_all(root: &Path, paths: &[PathBuf]) -> (Vec<DocumentRecord>, Vec<SkippedEntry>) {
    let results: Vec<Result<DocumentRecord, SkippedEntry>> =
        paths.par_iter().map(|path| read_document(root, path)).collect();

    let mut documents = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(doc) => documents.push(doc),
            Err(skip) => {
                warn!("Skipping {}: {}", skip.path.display(), skip.reason);
                skipped.push(skip);
            }
        }
    }

    documents.sort_by(|a, b| compare_names(&a.relative_path, &b.relative_path));
    (documents, skipped)
}

/// Build one record from a file on disk.
fn read_document(root: &Path, path: &Path) -> Result<DocumentRecord, SkippedEntry> {
    let skip = |reason| SkippedEntry {
        path: path.to_path_buf(),
        reason,
    };

    let relative_path = relative_path(root, path).ok_or_else(|| skip(SkipReason::NonUtf8Path))?;

    let bytes = std::fs::read(path).map_err(|e| skip(SkipReason::Io(e.to_string())))?;
    let raw = String::from_utf8(bytes).map_err(|_| skip(SkipReason::NonUtf8Content))?;
    let meta = std::fs::metadata(path).map_err(|e| skip(SkipReason::Io(e.to_string())))?;

    let parsed = parse_document(&raw).map_err(|e| skip(SkipReason::InvalidFrontMatter(e)))?;

    let name = document_name(&relative_path);
    let title = document_title(&parsed.front_matter, &name);

    Ok(DocumentRecord {
        path: path.to_path_buf(),
        relative_path,
        name,
        title,
        content: parsed.body,
        front_matter: parsed.front_matter,
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
        size: meta.len(),
    })
}

/// Slash-joined path of `path` below `root`; `None` if it is not below
/// `root` or is not valid UTF-8.
pub(crate) fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(seg) => segments.push(seg.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// File name without its final extension.
fn document_name(relative_path: &str) -> String {
    let file = relative_path.rsplit('/').next().unwrap_or(relative_path);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joins_with_slashes() {
        let root = Path::new("/srv/docs");
        let path = root.join("guide").join("intro.md");
        assert_eq!(relative_path(root, &path).as_deref(), Some("guide/intro.md"));
    }

    #[test]
    fn test_relative_path_outside_root_is_none() {
        assert_eq!(relative_path(Path::new("/srv/docs"), Path::new("/etc/x.md")), None);
        assert_eq!(relative_path(Path::new("/srv/docs"), Path::new("/srv/docs")), None);
    }

    #[test]
    fn test_document_name_strips_last_extension() {
        assert_eq!(document_name("guide/getting-started.md"), "getting-started");
        assert_eq!(document_name("notes.v2.markdown"), "notes.v2");
        assert_eq!(document_name(".md"), ".md");
    }
}
