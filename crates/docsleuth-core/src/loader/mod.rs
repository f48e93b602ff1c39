/// Loader module — turns a documents root into a sorted catalog.
///
/// - [`load_catalog`] runs discovery and parsing synchronously.
/// - [`start_load`] runs the same work on a named background thread and
///   reports through a bounded channel, for frontends that must stay
///   responsive while the catalog is built.
pub mod frontmatter;
pub mod progress;
mod walk;

use crate::config::LoaderConfig;
use crate::error::{LoadError, TreeError};
use crate::model::{DocumentRecord, TreeNode};
use progress::LoadProgress;

use crossbeam_channel::Receiver;
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Why a discovered file is missing from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SkipReason {
    #[error("read failed: {0}")]
    Io(String),
    #[error("path is not valid UTF-8")]
    NonUtf8Path,
    #[error("content is not valid UTF-8")]
    NonUtf8Content,
    #[error("invalid front-matter: {0}")]
    InvalidFrontMatter(String),
    #[error("directory walk failed: {0}")]
    Walk(String),
}

/// A file (or directory) that was discovered but could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything a load produced.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Absolute root the relative paths are based on.
    pub root: PathBuf,
    /// Sorted by relative path.
    pub documents: Vec<DocumentRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl Catalog {
    /// Look a document up by its relative path.
    pub fn find(&self, relative_path: &str) -> Option<&DocumentRecord> {
        self.documents
            .iter()
            .find(|doc| doc.relative_path == relative_path)
    }

    /// Build the display tree for this catalog.
    pub fn tree(&self) -> Result<Vec<TreeNode>, TreeError> {
        crate::tree::build_tree(&self.documents)
    }

    /// Sum of all document sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.documents.iter().map(|doc| doc.size).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Discover, read and parse every document under `config.root`.
///
/// Fails only if the root itself is unusable. Individual files that
/// cannot be read or parsed are reported in [`Catalog::skipped`].
pub fn load_catalog(config: &LoaderConfig) -> Result<Catalog, LoadError> {
    check_root(config)?;

    let start = Instant::now();
    let (paths, mut skipped) = walk::discover(config);
    let (documents, unreadable) = walk::read_all(&config.root, &paths);
    skipped.extend(unreadable);

    info!(
        "Loaded {} documents from {} in {:?} ({} skipped)",
        documents.len(),
        config.root.display(),
        start.elapsed(),
        skipped.len()
    );

    Ok(Catalog {
        root: config.root.clone(),
        documents,
        skipped,
    })
}

fn check_root(config: &LoaderConfig) -> Result<(), LoadError> {
    match std::fs::metadata(&config.root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(LoadError::NotADirectory(config.root.clone())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LoadError::RootNotFound(config.root.clone()))
        }
        Err(source) => Err(LoadError::Io {
            path: config.root.clone(),
            source,
        }),
    }
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// A load sends at most three messages, so the channel never blocks.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 16;

/// Handle to a running or completed background load.
pub struct LoadHandle {
    /// Receiver for progress updates from the loader thread.
    pub progress_rx: Receiver<LoadProgress>,
    _thread: Option<thread::JoinHandle<()>>,
}

/// Start loading `config` on a background thread.
pub fn start_load(config: LoaderConfig) -> std::io::Result<LoadHandle> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<LoadProgress>(PROGRESS_CHANNEL_CAPACITY);

    let thread = thread::Builder::new()
        .name("docsleuth-loader".into())
        .spawn(move || {
            info!("Starting load of {}", config.root.display());
            let start = Instant::now();

            if let Err(err) = check_root(&config) {
                let _ = progress_tx.send(LoadProgress::Failed {
                    message: err.to_string(),
                });
                return;
            }

            let (paths, mut skipped) = walk::discover(&config);
            let _ = progress_tx.send(LoadProgress::Discovered { files: paths.len() });

            let (documents, unreadable) = walk::read_all(&config.root, &paths);
            skipped.extend(unreadable);

            let catalog = Catalog {
                root: config.root.clone(),
                documents,
                skipped,
            };
            let duration = start.elapsed();
            info!(
                "Loaded {} documents in {duration:?} ({} skipped)",
                catalog.len(),
                catalog.skipped.len()
            );
            let _ = progress_tx.send(LoadProgress::Complete { catalog, duration });
        })?;

    Ok(LoadHandle {
        progress_rx,
        _thread: Some(thread),
    })
}
