/// DocSleuth Core — loading, tree building, and formatting.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI).
///
/// # Modules
///
/// - [`config`] — Explicit loader configuration and documents-root resolution.
/// - [`loader`] — Document discovery, front-matter parsing, background loading.
/// - [`model`] — Document records, tree nodes, and display formatting.
/// - [`tree`] — Builds the sorted display tree from the flat listing.
/// - [`export`] — Text, JSON, and CSV renderings of the listing and tree.
/// - [`error`] — Error types.
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod tree;

pub use config::LoaderConfig;
pub use error::{ConfigError, LoadError, TreeError};
pub use loader::{load_catalog, Catalog};
pub use model::{DocumentRecord, NodeKind, TreeNode};
pub use tree::build_tree;
