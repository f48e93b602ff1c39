/// Headless renderers for the listing and the tree.
///
/// Text output is meant for a terminal; JSON and CSV for other tools.
/// Listing rows never include document bodies.
use crate::loader::{Catalog, SkippedEntry};
use crate::model::date::format_local_date;
use crate::model::size::format_size;
use crate::model::{DocumentRecord, TreeNode};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One listing row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow<'a> {
    pub relative_path: &'a str,
    pub title: &'a str,
    pub size: u64,
    pub size_label: String,
    /// RFC 3339, empty when unknown.
    pub modified: String,
    pub modified_label: String,
}

impl<'a> From<&'a DocumentRecord> for ListingRow<'a> {
    fn from(doc: &'a DocumentRecord) -> Self {
        Self {
            relative_path: &doc.relative_path,
            title: &doc.title,
            size: doc.size,
            size_label: format_size(doc.size),
            modified: doc.modified.map(|m| m.to_rfc3339()).unwrap_or_default(),
            modified_label: doc.modified.as_ref().map(format_local_date).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct ListingDocument<'a> {
    root: &'a Path,
    documents: Vec<ListingRow<'a>>,
    skipped: &'a [SkippedEntry],
}

/// Listing as a pretty-printed JSON object with `root`, `documents` and
/// `skipped` fields.
pub fn listing_to_json(catalog: &Catalog) -> serde_json::Result<String> {
    let listing = ListingDocument {
        root: &catalog.root,
        documents: catalog.documents.iter().map(ListingRow::from).collect(),
        skipped: &catalog.skipped,
    };
    serde_json::to_string_pretty(&listing)
}

/// Forest as pretty-printed JSON.
pub fn tree_to_json(forest: &[TreeNode]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(forest)
}

/// Listing as CSV with a header row.
pub fn write_listing_csv<W: Write>(documents: &[DocumentRecord], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for doc in documents {
        csv_writer.serialize(ListingRow::from(doc))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Listing as an aligned text table.
pub fn render_listing_text(documents: &[DocumentRecord]) -> String {
    let rows: Vec<ListingRow<'_>> = documents.iter().map(ListingRow::from).collect();
    let path_w = rows
        .iter()
        .map(|r| r.relative_path.chars().count())
        .chain(std::iter::once("PATH".len()))
        .max()
        .unwrap_or(0);
    let title_w = rows
        .iter()
        .map(|r| r.title.chars().count())
        .chain(std::iter::once("TITLE".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<path_w$}  {:<title_w$}  {:>9}  MODIFIED\n",
        "PATH", "TITLE", "SIZE"
    );
    for row in &rows {
        let line = format!(
            "{:<path_w$}  {:<title_w$}  {:>9}  {}",
            row.relative_path, row.title, row.size_label, row.modified_label
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Forest as an indented outline. Directories end with `/`.
pub fn render_tree_text(forest: &[TreeNode]) -> String {
    let mut out = String::new();
    render_level(forest, 0, &mut out);
    out
}

fn render_level(nodes: &[TreeNode], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        if node.is_dir() {
            out.push_str(&node.name);
            out.push_str("/\n");
            render_level(&node.children, depth + 1, out);
        } else {
            out.push_str(&node.name);
            out.push_str("  (");
            out.push_str(&node.path);
            out.push_str(")\n");
        }
    }
}
