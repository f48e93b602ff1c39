/// Tree construction from the flat, path-keyed document listing.
///
/// A single pass creates directory nodes lazily as document paths are
/// walked; a separate final pass sorts every level. Because the sort does
/// not depend on insertion order, the output is identical for any
/// permutation of the input.
use crate::error::TreeError;
use crate::model::{DocumentRecord, TreeNode};
use tracing::debug;

/// Build the display forest for `documents`.
///
/// Fails without returning a partial tree if any path is malformed, a
/// path is needed both as a file and as a directory, two documents share
/// a path, or two siblings would share a display name.
pub fn build_tree(documents: &[DocumentRecord]) -> Result<Vec<TreeNode>, TreeError> {
    let mut forest: Vec<TreeNode> = Vec::new();

    for doc in documents {
        insert_document(&mut forest, doc)?;
    }

    sort_forest(&mut forest);

    debug!(
        "Built tree: {} documents, {} directories, depth {}",
        documents.len(),
        count_dirs(&forest),
        depth(&forest)
    );
    Ok(forest)
}

/// Split a relative path into its segments, rejecting anything that would
/// produce a malformed node.
fn split_segments(relative_path: &str) -> Result<Vec<&str>, TreeError> {
    let invalid = |reason| TreeError::InvalidPath {
        path: relative_path.to_string(),
        reason,
    };

    if relative_path.is_empty() {
        return Err(invalid("path is empty"));
    }

    let segments: Vec<&str> = relative_path.split('/').collect();
    for segment in &segments {
        match *segment {
            "" => return Err(invalid("empty path segment")),
            "." | ".." => return Err(invalid("relative path segment")),
            _ => {}
        }
    }
    Ok(segments)
}

/// Walk one document's segments down the forest, creating nodes as needed.
fn insert_document(forest: &mut Vec<TreeNode>, doc: &DocumentRecord) -> Result<(), TreeError> {
    let segments = split_segments(&doc.relative_path)?;
    let last = segments.len() - 1;
    let mut level = forest;

    for (i, segment) in segments.iter().enumerate() {
        // Match on the node's own path rather than its name: a file's name
        // is its title, which says nothing about the segment it occupies.
        let prefix = segments[..=i].join("/");
        let found = level.iter().position(|node| node.path == prefix);

        if i == last {
            return match found {
                Some(idx) if level[idx].is_dir() => Err(TreeError::ConflictingNode {
                    path: doc.relative_path.clone(),
                    existing: level[idx].path.clone(),
                }),
                Some(_) => Err(TreeError::DuplicatePath {
                    path: doc.relative_path.clone(),
                }),
                None => {
                    push_unique(level, TreeNode::new_file(&doc.title, &doc.relative_path))?;
                    Ok(())
                }
            };
        }

        let idx = match found {
            Some(idx) if level[idx].is_file() => {
                return Err(TreeError::ConflictingNode {
                    path: prefix,
                    existing: level[idx].path.clone(),
                })
            }
            Some(idx) => idx,
            None => push_unique(level, TreeNode::new_dir(segment, prefix))?,
        };
        level = &mut level[idx].children;
    }

    Ok(())
}

/// Append `node` to `siblings`, keeping sibling names unique.
fn push_unique(siblings: &mut Vec<TreeNode>, node: TreeNode) -> Result<usize, TreeError> {
    if let Some(clash) = siblings.iter().find(|n| n.name == node.name) {
        return Err(TreeError::ConflictingNode {
            path: node.path,
            existing: clash.path.clone(),
        });
    }
    siblings.push(node);
    Ok(siblings.len() - 1)
}

/// Directories before files, each group by name, at every level.
fn sort_forest(nodes: &mut [TreeNode]) {
    nodes.sort_by(TreeNode::display_cmp);
    for node in nodes.iter_mut() {
        sort_forest(&mut node.children);
    }
}

/// Find the node (file or directory) whose path is exactly `path`.
pub fn find_node<'a>(forest: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    for node in forest {
        if node.path == path {
            return Some(node);
        }
        let below = path
            .strip_prefix(node.path.as_str())
            .is_some_and(|rest| rest.starts_with('/'));
        if node.is_dir() && below {
            return find_node(&node.children, path);
        }
    }
    None
}

/// Depth-first iterator over file nodes, in display order.
pub fn leaves(forest: &[TreeNode]) -> Leaves<'_> {
    Leaves {
        stack: vec![forest.iter()],
    }
}

pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, TreeNode>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.stack.last_mut()?.next();
            match next {
                Some(node) if node.is_dir() => self.stack.push(node.children.iter()),
                Some(node) => return Some(node),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Number of levels in the forest; 0 when empty.
pub fn depth(forest: &[TreeNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + depth(&node.children))
        .max()
        .unwrap_or(0)
}

pub fn count_files(forest: &[TreeNode]) -> usize {
    leaves(forest).count()
}

pub fn count_dirs(forest: &[TreeNode]) -> usize {
    forest
        .iter()
        .filter(|node| node.is_dir())
        .map(|node| 1 + count_dirs(&node.children))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn doc(path: &str, title: &str) -> DocumentRecord {
        DocumentRecord::new(path, title)
    }

    /// Assert that every level is ordered directories-first, then by name.
    fn assert_display_order(nodes: &[TreeNode]) {
        for pair in nodes.windows(2) {
            assert_eq!(
                pair[0].display_cmp(&pair[1]),
                std::cmp::Ordering::Less,
                "{:?} must precede {:?}",
                pair[0].name,
                pair[1].name
            );
        }
        for node in nodes {
            assert_display_order(&node.children);
        }
    }

    /// Every permutation of `items`, for order-independence checks.
    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                out.push(tail);
            }
        }
        out
    }

    fn sample_docs() -> Vec<DocumentRecord> {
        vec![
            doc("README.md", "Readme"),
            doc("guide/intro.md", "Intro"),
            doc("guide/advanced/tuning.md", "Tuning"),
            doc("api/errors.md", "Errors"),
            doc("changelog.md", "Changelog"),
        ]
    }

    // ── Scenarios ────────────────────────────────────────────────────────

    #[test]
    fn single_nested_document() {
        let forest = build_tree(&[doc("guide/intro.md", "Intro")]).unwrap();

        assert_eq!(
            forest,
            vec![TreeNode {
                name: "guide".into(),
                path: "guide".into(),
                kind: NodeKind::Directory,
                children: vec![TreeNode::new_file("Intro", "guide/intro.md")],
            }]
        );
    }

    #[test]
    fn directories_precede_files_at_top_level() {
        let forest = build_tree(&[doc("a.md", "A"), doc("b/c.md", "C")]).unwrap();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].name, "b");
        assert_eq!(forest[0].kind, NodeKind::Directory);
        assert_eq!(forest[0].children[0].name, "C");
        assert_eq!(forest[1].name, "A");
        assert_eq!(forest[1].kind, NodeKind::File);
    }

    #[test]
    fn shared_prefix_reuses_directory() {
        let forest = build_tree(&[doc("docs/y.md", "Yankee"), doc("docs/x.md", "Xray")]).unwrap();

        assert_eq!(forest.len(), 1, "one docs directory");
        let names: Vec<&str> = forest[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Xray", "Yankee"]);
    }

    #[test]
    fn file_and_directory_collision_is_rejected() {
        let err = build_tree(&[doc("a", "A"), doc("a/b.md", "B")]).unwrap_err();
        assert!(
            matches!(err, TreeError::ConflictingNode { ref path, .. } if path == "a"),
            "got {err:?}"
        );

        // Same collision discovered from the other side.
        let err = build_tree(&[doc("a/b.md", "B"), doc("a", "A")]).unwrap_err();
        assert!(matches!(err, TreeError::ConflictingNode { .. }), "got {err:?}");
    }

    // ── Properties ───────────────────────────────────────────────────────

    #[test]
    fn output_is_independent_of_input_order() {
        let docs = sample_docs();
        let expected = build_tree(&docs).unwrap();
        for permutation in permutations(&docs) {
            assert_eq!(build_tree(&permutation).unwrap(), expected);
        }
    }

    #[test]
    fn every_document_has_exactly_one_leaf() {
        let docs = sample_docs();
        let forest = build_tree(&docs).unwrap();

        for d in &docs {
            let hits = leaves(&forest)
                .filter(|leaf| leaf.path == d.relative_path)
                .count();
            assert_eq!(hits, 1, "leaf for {}", d.relative_path);
            let found = find_node(&forest, &d.relative_path).expect("reachable by path");
            assert_eq!(found.name, d.title);
        }
        assert_eq!(count_files(&forest), docs.len());
    }

    #[test]
    fn every_level_is_display_ordered() {
        let mut docs = sample_docs();
        docs.push(doc("guide/zeta.md", "alpha"));
        docs.push(doc("guide/beta.md", "Beta"));
        let forest = build_tree(&docs).unwrap();
        assert_display_order(&forest);
    }

    #[test]
    fn building_twice_gives_equal_output() {
        let docs = sample_docs();
        assert_eq!(build_tree(&docs).unwrap(), build_tree(&docs).unwrap());
    }

    #[test]
    fn depth_matches_longest_path() {
        let forest = build_tree(&sample_docs()).unwrap();
        assert_eq!(depth(&forest), 3);
        assert_eq!(count_dirs(&forest), 3, "guide, guide/advanced, api");
        assert_eq!(depth(&[]), 0);
    }

    #[test]
    fn empty_input_gives_empty_forest() {
        assert!(build_tree(&[]).unwrap().is_empty());
    }

    // ── Failure cases ────────────────────────────────────────────────────

    #[test]
    fn malformed_paths_are_rejected() {
        for bad in ["", "/a.md", "a//b.md", "a/", "../x.md", "guide/./x.md"] {
            let err = build_tree(&[doc(bad, "X")]).unwrap_err();
            assert!(
                matches!(err, TreeError::InvalidPath { .. }),
                "{bad:?} should be invalid, got {err:?}"
            );
        }
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let err = build_tree(&[doc("a.md", "A"), doc("a.md", "Other")]).unwrap_err();
        assert_eq!(
            err,
            TreeError::DuplicatePath {
                path: "a.md".into()
            }
        );
    }

    #[test]
    fn sibling_name_clash_is_rejected() {
        // Two different files that resolve to the same display title.
        let err = build_tree(&[doc("guide/a.md", "Setup"), doc("guide/b.md", "Setup")])
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::ConflictingNode {
                path: "guide/b.md".into(),
                existing: "guide/a.md".into(),
            }
        );

        // A file titled like a sibling directory.
        let err = build_tree(&[doc("guide.md", "guide"), doc("guide/intro.md", "Intro")])
            .unwrap_err();
        assert!(matches!(err, TreeError::ConflictingNode { .. }));
    }

    #[test]
    fn same_title_in_different_directories_is_fine() {
        let forest = build_tree(&[doc("a/index.md", "Index"), doc("b/index.md", "Index")]).unwrap();
        assert_eq!(count_files(&forest), 2);
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    #[test]
    fn find_node_locates_directories_and_misses_cleanly() {
        let forest = build_tree(&sample_docs()).unwrap();
        assert_eq!(
            find_node(&forest, "guide/advanced").map(|n| n.kind),
            Some(NodeKind::Directory)
        );
        assert!(find_node(&forest, "guide/missing.md").is_none());
        assert!(find_node(&forest, "gui").is_none());
    }

    #[test]
    fn leaves_follow_display_order() {
        let forest = build_tree(&sample_docs()).unwrap();
        let order: Vec<&str> = leaves(&forest).map(|n| n.path.as_str()).collect();
        assert_eq!(
            order,
            [
                "api/errors.md",
                "guide/advanced/tuning.md",
                "guide/intro.md",
                "changelog.md",
                "README.md",
            ]
        );
    }
}
