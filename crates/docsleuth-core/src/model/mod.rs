/// Data model for DocSleuth.
///
/// Document records produced by the loader, the display tree, and the
/// pure formatting helpers used by every frontend.
pub mod date;
pub mod document;
pub mod size;
pub mod tree_node;

pub use document::{DocumentRecord, FrontMatter};
pub use tree_node::{compare_names, NodeKind, TreeNode};
