/// One entry in the display hierarchy.
///
/// Unlike a scanner arena, the documentation tree is small and immutable
/// once built, so nodes own their children directly and the forest
/// serialises as plain nested JSON.
use compact_str::CompactString;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Directory segment, or the document title for files.
    pub name: CompactString,

    /// Full relative path: the directory prefix, or the document's
    /// `relative_path` for files.
    pub path: String,

    pub kind: NodeKind,

    /// Always empty for files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new_file(title: &str, relative_path: &str) -> Self {
        Self {
            name: CompactString::new(title),
            path: relative_path.to_string(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn new_dir(segment: &str, path: String) -> Self {
        Self {
            name: CompactString::new(segment),
            path,
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Display ordering between two siblings: directories first, then by name.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .is_dir()
            .cmp(&self.is_dir())
            .then_with(|| compare_names(&self.name, &other.name))
    }
}

/// Case-aware lexicographic order.
///
/// Compares case-insensitively first so `apple` sorts next to `Apple`
/// rather than after `Zebra`; names equal ignoring case fall back to
/// byte order, which keeps the order total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_names_ignores_case_first() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_compare_names_is_total() {
        assert_eq!(compare_names("Readme", "readme"), Ordering::Less);
        assert_eq!(compare_names("readme", "Readme"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_display_cmp_directories_first() {
        let dir = TreeNode::new_dir("zzz", "zzz".into());
        let file = TreeNode::new_file("Aaa", "aaa.md");
        assert_eq!(dir.display_cmp(&file), Ordering::Less);
        assert_eq!(file.display_cmp(&dir), Ordering::Greater);
    }

    #[test]
    fn test_file_serialises_without_children() {
        let file = TreeNode::new_file("Intro", "guide/intro.md");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Intro", "path": "guide/intro.md", "kind": "file"})
        );
    }
}
