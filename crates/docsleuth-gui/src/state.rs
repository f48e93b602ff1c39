/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The loader thread communicates via a channel; state updates happen
/// in `process_load_messages()` which runs once per frame.
///
/// The tree view renders from a flat `visible_rows` list that is rebuilt
/// from the forest whenever expansion or the filter changes.
use crate::markdown::{parse_blocks, Block};
use crate::theme::ThemeMode;
use docsleuth_core::loader::progress::LoadProgress;
use docsleuth_core::loader::{start_load, Catalog, LoadHandle};
use docsleuth_core::model::{DocumentRecord, TreeNode};
use docsleuth_core::LoaderConfig;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::warn;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Catalog is being loaded in the background.
    Loading,
    /// Catalog is available.
    Ready,
    /// The documents root could not be loaded.
    Failed,
}

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralView {
    /// The selected document.
    Document,
    /// The flat listing of every document.
    Listing,
}

/// A row in the flattened visible-rows list for the virtualised TreeView.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleRow {
    /// Child indices leading from the forest top level down to the node.
    pub address: Vec<usize>,
    /// Nesting depth (0 = top level).
    pub depth: u16,
    /// Whether this directory is currently expanded (meaningless for files).
    pub is_expanded: bool,
}

/// Maximum number of load messages drained from the channel per frame.
const MAX_MESSAGES_PER_FRAME: usize = 16;

/// Maximum rows in the virtualised tree-view visible-rows list.
const MAX_VISIBLE_ROWS: usize = 100_000;

/// All application state.
pub struct AppState {
    // ── Load ───────────────────────────────────────────
    pub config: LoaderConfig,
    pub phase: AppPhase,
    pub load_handle: Option<LoadHandle>,
    pub files_discovered: usize,
    pub load_duration: Option<Duration>,
    pub load_error: Option<String>,

    // ── Results ────────────────────────────────────────
    pub catalog: Option<Catalog>,
    /// Display tree; a flat fallback when `tree_error` is set.
    pub forest: Vec<TreeNode>,
    /// Why the real tree could not be built, if it could not.
    pub tree_error: Option<String>,
    pub visible_rows: Vec<VisibleRow>,
    /// Paths of expanded directories.
    pub expanded: HashSet<String>,
    /// Forest address of the selected document.
    pub selected: Option<Vec<usize>>,
    /// Relative path to position in `catalog.documents`.
    doc_index: HashMap<String, usize>,

    // ── UI state ───────────────────────────────────────
    /// Case-insensitive title/path filter for the tree.
    pub filter: String,
    pub view: CentralView,
    /// Show the body as Markdown source instead of rendered.
    pub show_raw_body: bool,
    /// Parsed body of the selected document, keyed by record index.
    rendered_body: Option<(usize, Vec<Block>)>,
    pub theme_mode: ThemeMode,
    pub show_help: bool,
    pub show_about: bool,
    pub show_skipped: bool,
}

impl AppState {
    /// Create initial application state. Nothing is loaded until
    /// [`start_load`](Self::start_load) is called.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            phase: AppPhase::Loading,
            load_handle: None,
            files_discovered: 0,
            load_duration: None,
            load_error: None,
            catalog: None,
            forest: Vec::new(),
            tree_error: None,
            visible_rows: Vec::new(),
            expanded: HashSet::new(),
            selected: None,
            doc_index: HashMap::new(),
            filter: String::new(),
            view: CentralView::Document,
            show_raw_body: false,
            rendered_body: None,
            theme_mode: ThemeMode::Dark,
            show_help: false,
            show_about: false,
            show_skipped: false,
        }
    }

    /// Start loading the configured root on a background thread.
    pub fn start_load(&mut self) {
        self.phase = AppPhase::Loading;
        self.files_discovered = 0;
        self.load_duration = None;
        self.load_error = None;
        self.catalog = None;
        self.forest.clear();
        self.tree_error = None;
        self.visible_rows.clear();
        self.expanded.clear();
        self.selected = None;
        self.doc_index.clear();
        self.rendered_body = None;

        match start_load(self.config.clone()) {
            Ok(handle) => self.load_handle = Some(handle),
            Err(err) => {
                warn!("Could not start loader thread: {err}");
                self.fail(format!("could not start loader: {err}"));
            }
        }
    }

    /// Process pending load messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_load_messages(&mut self) -> bool {
        let mut repaint = false;

        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let msg = match self.load_handle.as_ref() {
                Some(handle) => match handle.progress_rx.try_recv() {
                    Ok(m) => m,
                    Err(crossbeam_channel::TryRecvError::Empty) => break,
                    Err(crossbeam_channel::TryRecvError::Disconnected) => {
                        self.fail("loader stopped unexpectedly".to_string());
                        return true;
                    }
                },
                None => break,
            };
            repaint = true;

            match msg {
                LoadProgress::Discovered { files } => {
                    self.files_discovered = files;
                }
                LoadProgress::Complete { catalog, duration } => {
                    self.load_duration = Some(duration);
                    self.load_handle = None;
                    self.set_catalog(catalog);
                    return true;
                }
                LoadProgress::Failed { message } => {
                    self.fail(message);
                    return true;
                }
            }
        }

        repaint
    }

    fn fail(&mut self, message: String) {
        self.phase = AppPhase::Failed;
        self.load_error = Some(message);
        self.load_handle = None;
    }

    /// Install a loaded catalog and build the tree for it.
    ///
    /// If the tree cannot be built, every document is shown as a
    /// top-level entry named by its relative path and the construction
    /// error is kept for display. The fallback holds exactly one leaf per
    /// record, in record order, so duplicate paths stay distinguishable.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        match catalog.tree() {
            Ok(forest) => {
                self.forest = forest;
                self.tree_error = None;
            }
            Err(err) => {
                warn!("Tree construction failed, showing flat listing: {err}");
                self.forest = catalog
                    .documents
                    .iter()
                    .map(|doc| TreeNode::new_file(&doc.relative_path, &doc.relative_path))
                    .collect();
                self.tree_error = Some(err.to_string());
            }
        }

        // Top-level directories start expanded.
        self.expanded = self
            .forest
            .iter()
            .filter(|node| node.is_dir())
            .map(|node| node.path.clone())
            .collect();

        let mut doc_index = HashMap::with_capacity(catalog.documents.len());
        for (idx, doc) in catalog.documents.iter().enumerate() {
            doc_index.entry(doc.relative_path.clone()).or_insert(idx);
        }
        self.doc_index = doc_index;
        self.selected = None;
        self.rendered_body = None;

        self.catalog = Some(catalog);
        self.phase = AppPhase::Ready;
        self.rebuild_visible_rows();
    }

    /// The node at a row address, if it still exists.
    pub fn node_at(&self, address: &[usize]) -> Option<&TreeNode> {
        let (first, rest) = address.split_first()?;
        let mut node = self.forest.get(*first)?;
        for &idx in rest {
            node = node.children.get(idx)?;
        }
        Some(node)
    }

    /// Position in `catalog.documents` of the file node at `address`.
    pub fn document_index_at(&self, address: &[usize]) -> Option<usize> {
        let node = self.node_at(address)?;
        if !node.is_file() {
            return None;
        }
        if self.tree_error.is_some() {
            // Flat fallback: leaf `i` is record `i`.
            return address.first().copied();
        }
        self.doc_index.get(&node.path).copied()
    }

    /// The record shown by the file node at `address`.
    pub fn document_at(&self, address: &[usize]) -> Option<&DocumentRecord> {
        let idx = self.document_index_at(address)?;
        self.catalog.as_ref()?.documents.get(idx)
    }

    /// Position in `catalog.documents` of the selected document.
    pub fn selected_index(&self) -> Option<usize> {
        self.document_index_at(self.selected.as_deref()?)
    }

    /// The currently selected document record.
    pub fn selected_document(&self) -> Option<&DocumentRecord> {
        self.document_at(self.selected.as_deref()?)
    }

    /// Relative path of the selected document.
    pub fn selected_path(&self) -> Option<&str> {
        self.selected_document().map(|doc| doc.relative_path.as_str())
    }

    /// Parse the selected document's body unless it is already cached.
    pub fn prepare_rendered_body(&mut self) {
        let Some(idx) = self.selected_index() else {
            self.rendered_body = None;
            return;
        };
        if matches!(&self.rendered_body, Some((cached, _)) if *cached == idx) {
            return;
        }
        let blocks = self
            .catalog
            .as_ref()
            .and_then(|c| c.documents.get(idx))
            .map(|doc| parse_blocks(&doc.content))
            .unwrap_or_default();
        self.rendered_body = Some((idx, blocks));
    }

    /// Blocks of the selected document as of the last
    /// [`prepare_rendered_body`](Self::prepare_rendered_body); empty if
    /// the selection has changed since.
    pub fn rendered_body(&self) -> &[Block] {
        match (&self.rendered_body, self.selected_index()) {
            (Some((cached, blocks)), Some(idx)) if *cached == idx => blocks.as_slice(),
            _ => &[],
        }
    }

    /// Handle a click on a row: files become the selection, directories
    /// toggle.
    pub fn activate_row(&mut self, row_index: usize) {
        let Some(row) = self.visible_rows.get(row_index) else {
            return;
        };
        let Some(node) = self.node_at(&row.address) else {
            return;
        };
        if node.is_dir() {
            self.toggle_expand(row_index);
        } else {
            self.selected = Some(row.address.clone());
            self.view = CentralView::Document;
        }
    }

    /// Toggle expansion of the directory at the given row index.
    ///
    /// While a filter is active every matching branch is shown expanded,
    /// so toggling only takes effect once the filter is cleared.
    pub fn toggle_expand(&mut self, row_index: usize) {
        let Some(row) = self.visible_rows.get(row_index) else {
            return;
        };
        let Some(node) = self.node_at(&row.address) else {
            return;
        };
        if !node.is_dir() {
            return;
        }

        let path = node.path.clone();
        if !self.expanded.remove(&path) {
            self.expanded.insert(path);
        }
        self.rebuild_visible_rows();
    }

    pub fn expand_all(&mut self) {
        let mut dirs = HashSet::new();
        collect_dir_paths(&self.forest, &mut dirs);
        self.expanded = dirs;
        self.rebuild_visible_rows();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.rebuild_visible_rows();
    }

    /// Replace the tree filter and refresh the rows.
    pub fn set_filter(&mut self, filter: &str) {
        if self.filter != filter {
            self.filter = filter.to_string();
            self.rebuild_visible_rows();
        }
    }

    /// Select the record at `index` in `catalog.documents` and expand its
    /// ancestors so it is visible in the tree.
    pub fn reveal_document(&mut self, index: usize) {
        let Some(address) = self.address_of_document(index) else {
            return;
        };
        for depth in 1..address.len() {
            if let Some(node) = self.node_at(&address[..depth]) {
                self.expanded.insert(node.path.clone());
            }
        }
        self.selected = Some(address);
        self.view = CentralView::Document;
        self.rebuild_visible_rows();
    }

    /// Forest address of the leaf for the record at `index`.
    fn address_of_document(&self, index: usize) -> Option<Vec<usize>> {
        if self.tree_error.is_some() {
            return (index < self.forest.len()).then(|| vec![index]);
        }

        let doc = self.catalog.as_ref()?.documents.get(index)?;
        let mut address = Vec::new();
        let mut level = self.forest.as_slice();
        let mut prefix = String::new();
        for segment in doc.relative_path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            let pos = level.iter().position(|node| node.path == prefix)?;
            address.push(pos);
            level = &level[pos].children;
        }
        Some(address)
    }

    /// Move the selection to the next (`forward`) or previous visible
    /// document, skipping directory rows.
    pub fn step_selection(&mut self, forward: bool) {
        let files: Vec<usize> = (0..self.visible_rows.len())
            .filter(|&i| {
                self.node_at(&self.visible_rows[i].address)
                    .is_some_and(TreeNode::is_file)
            })
            .collect();
        if files.is_empty() {
            return;
        }

        let current = self
            .selected_row()
            .and_then(|row| files.iter().position(|&f| f == row));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => files.len() - 1,
            (Some(pos), true) => (pos + 1).min(files.len() - 1),
            (Some(pos), false) => pos.saturating_sub(1),
        };
        self.activate_row(files[next]);
    }

    /// Row index of the selected document, if it is visible.
    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.visible_rows
            .iter()
            .position(|row| row.address == selected)
    }

    /// Rebuild `visible_rows` from the forest, expansion set and filter.
    ///
    /// Stops inserting once [`MAX_VISIBLE_ROWS`] is reached.
    pub fn rebuild_visible_rows(&mut self) {
        let needle = self.filter.trim().to_lowercase();
        let mut rows = Vec::new();
        let mut address = Vec::new();
        push_rows(
            &self.forest,
            &mut address,
            0,
            &self.expanded,
            &needle,
            &mut rows,
        );
        self.visible_rows = rows;
    }
}

/// Recursively append rows for `nodes`.
fn push_rows(
    nodes: &[TreeNode],
    address: &mut Vec<usize>,
    depth: u16,
    expanded: &HashSet<String>,
    needle: &str,
    rows: &mut Vec<VisibleRow>,
) {
    for (idx, node) in nodes.iter().enumerate() {
        if rows.len() >= MAX_VISIBLE_ROWS {
            return;
        }
        if !needle.is_empty() && !subtree_matches(node, needle) {
            continue;
        }

        let is_expanded =
            node.is_dir() && (!needle.is_empty() || expanded.contains(&node.path));

        address.push(idx);
        rows.push(VisibleRow {
            address: address.clone(),
            depth,
            is_expanded,
        });
        if is_expanded {
            push_rows(&node.children, address, depth + 1, expanded, needle, rows);
        }
        address.pop();
    }
}

/// Whether a file, or any file below a directory, matches the filter.
fn subtree_matches(node: &TreeNode, needle: &str) -> bool {
    if node.is_dir() {
        node.children.iter().any(|child| subtree_matches(child, needle))
    } else {
        node.name.to_lowercase().contains(needle) || node.path.to_lowercase().contains(needle)
    }
}

fn collect_dir_paths(nodes: &[TreeNode], out: &mut HashSet<String>) {
    for node in nodes.iter().filter(|n| n.is_dir()) {
        out.insert(node.path.clone());
        collect_dir_paths(&node.children, out);
    }
}
